//! Merges glyphs from several fonts into private-use code points of one or
//! more target fonts, built with Rust and Linebender crates.

use anyhow::Result;
use fontmerge::{core, logging};

/// Set up logging and run one build with the given CLI arguments.
fn run_app(cli_args: core::cli::CliArgs) -> Result<()> {
    let _log_guard = logging::init_logging(cli_args.verbose, cli_args.log_file)?;
    core::runner::run(&cli_args)
}

fn main() {
    let cli_args = core::platform::get_cli_args();
    match run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
