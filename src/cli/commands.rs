//! CLI command implementations

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::table::TableStore;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, force } => init(&config, force),
        Command::Start {
            config,
            port,
            table,
        } => start(&config, port, table),
    }
}

/// Write a table file holding only the header row
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = TableStore::new(config.table_config());

    if !force && store.path().exists() {
        return Err(CliError::already_initialized(store.path()));
    }
    store.initialize(force)?;

    print_json(json!({
        "initialized": true,
        "path": store.path().display().to_string(),
    }))
}

/// Serve the table until Ctrl-C
pub fn start(config_path: &Path, port: Option<u16>, table: Option<PathBuf>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(table) = table {
        config.table_path = table;
    }
    config.validate()?;

    let store = TableStore::new(config.table_config());
    if !store.path().exists() {
        // Not fatal: the table can arrive later through /upload
        let path = store.path().display().to_string();
        log_event_with_fields(Event::TableMissing, &[("path", path.as_str())]);
    }

    let server = HttpServer::new(config.server.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Read the config file, or fall back to defaults when it does not exist
fn load_config(path: &Path) -> CliResult<Config> {
    let display = path.display().to_string();
    let config = if path.exists() {
        let config = Config::load(path)?;
        log_event_with_fields(Event::ConfigLoaded, &[("path", display.as_str())]);
        config
    } else {
        log_event_with_fields(Event::ConfigDefaulted, &[("path", display.as_str())]);
        Config::default()
    };

    Logger::set_min_severity(config.severity()?);
    Ok(config)
}

fn print_json(data: Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &json!({"status": "ok", "data": data}))?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("sheetapi.json");
        let config = json!({ "table_path": "tables/books.xlsx" });
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_init_creates_table() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(&config_path, false).unwrap();

        let config = Config::load(&config_path).unwrap();
        let store = TableStore::new(config.table_config());
        assert!(temp_dir.path().join("tables/books.xlsx").exists());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_init_refuses_reinit_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(&config_path, false).unwrap();

        let result = init(&config_path, false);
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );
        init(&config_path, true).unwrap();
    }

    #[test]
    fn test_invalid_config_stops_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sheetapi.json");
        fs::write(&config_path, r#"{"sheet_name": ""}"#).unwrap();

        let result = init(&config_path, false);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }
}
