//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - CLI handling
//! - Build configuration loading and validation
//! - The error taxonomy
//! - The build runner

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::{BuildConfig, FontConfig, PrivateRange, TargetConfig};
pub use errors::{BuildError, ResourceKind};
pub use runner::{build, build_map, run, BuildSummary};
