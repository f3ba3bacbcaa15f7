//! CLI argument definitions using clap
//!
//! Commands:
//! - sheetapi init --config <path> [--force]
//! - sheetapi start --config <path> [--port <port>] [--table <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sheetapi - serve a spreadsheet as a JSON API
#[derive(Parser, Debug)]
#[command(name = "sheetapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty table holding only the header row
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./sheetapi.json")]
        config: PathBuf,

        /// Overwrite an existing table file
        #[arg(long)]
        force: bool,
    },

    /// Serve the table over HTTP
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./sheetapi.json")]
        config: PathBuf,

        /// Port to listen on, overriding the config file
        #[arg(long)]
        port: Option<u16>,

        /// Table file, overriding the config file
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_overrides() {
        let cli = Cli::try_parse_from(["sheetapi", "start", "--port", "8080", "--table", "books.xlsx"])
            .unwrap();
        match cli.command {
            Command::Start { config, port, table } => {
                assert_eq!(config, PathBuf::from("./sheetapi.json"));
                assert_eq!(port, Some(8080));
                assert_eq!(table, Some(PathBuf::from("books.xlsx")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_init_force_flag() {
        let cli = Cli::try_parse_from(["sheetapi", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Init { force: true, .. }));
    }
}
