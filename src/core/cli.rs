//! Command line interface for fontmerge
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use crate::core::config_file::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Default directory every output is written to
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// fontmerge CLI arguments
///
/// Examples:
///   fontmerge                              # Build from ./fontmerge.toml into ./dist
///   fontmerge --config icons/fontmerge.toml
///   fontmerge --output-dir build/fonts -v  # Custom output, debug logging
///   fontmerge --map-only                   # Only write replacement_map.json
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "fontmerge",
    version,
    about = "Merge glyphs from several fonts into private-use code points",
    long_about = "fontmerge pulls the symbols listed for each source font out of its UFO source, moves them to unique code points in a private-use range, and merges them into every configured target font. It also writes the replacement map, MD5 checksums and HTML previews."
)]
pub struct CliArgs {
    /// Build configuration file
    #[clap(
        long = "config",
        short = 'c',
        default_value = DEFAULT_CONFIG_FILE,
        help = "Build configuration file (TOML)"
    )]
    pub config: PathBuf,

    /// Directory the merged fonts and artifacts are written to
    ///
    /// Created if it doesn't exist. Existing files with the same names are
    /// overwritten.
    #[clap(
        long = "output-dir",
        short = 'o',
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory for merged fonts and artifacts"
    )]
    pub output_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(long = "verbose", short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to ~/.config/fontmerge/logs/
    #[clap(long = "log-file", help = "Also write logs to the fontmerge logs directory")]
    pub log_file: bool,

    /// Stop after writing the replacement map
    ///
    /// Collects symbols and allocates code points, writes
    /// replacement_map.json, and skips merging, checksums and previews.
    #[clap(long = "map-only", help = "Only allocate and write replacement_map.json")]
    pub map_only: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// Catches the mistakes that would otherwise surface halfway through a
    /// run, with a message that says what to fix.
    pub fn validate(&self) -> Result<(), String> {
        if !self.config.is_file() {
            return Err(format!(
                "Configuration file does not exist: {}\nPass --config with the path to your fontmerge.toml.",
                self.config.display()
            ));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(format!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            ));
        }

        Ok(())
    }
}
