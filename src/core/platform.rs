//! Process-level entry helpers: argument parsing and fatal error reporting.

use crate::core::cli::CliArgs;
use clap::Parser;

/// Print the error with its causes to stderr and exit with code 1.
pub fn handle_error(error: anyhow::Error) -> ! {
    tracing::error!("{error:#}");
    eprintln!();
    eprintln!("Error: {error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse the command line arguments of this process.
pub fn get_cli_args() -> CliArgs {
    CliArgs::parse()
}
