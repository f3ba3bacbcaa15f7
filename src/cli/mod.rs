//! CLI module for sheetapi
//!
//! Provides command-line interface for:
//! - init: Create an empty table file
//! - start: Serve the table over HTTP

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
