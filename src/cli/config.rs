//! Configuration file
//!
//! One JSON object. Every key is optional; server keys (`host`, `port`,
//! `cors_origins`, `max_upload_bytes`) sit at the top level next to the
//! table keys. A relative `table_path` resolves against the directory
//! holding the config file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::table::{TableConfig, TableLayout, DEFAULT_COLUMNS};

use super::errors::{CliError, CliResult};

/// Longest sheet name a workbook accepts
const MAX_SHEET_NAME_LEN: usize = 31;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Table file (default: "data.xlsx")
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,

    /// Active sheet (default: "Sheet1")
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Rows skipped by key search and excluded from list output (default: 1)
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,

    /// Column searched for `bookno` (default: 0)
    #[serde(default)]
    pub key_column: usize,

    /// Header written by `init` (default: bookno, novel, author, country)
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Lowest severity logged (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_table_path() -> PathBuf {
    PathBuf::from("data.xlsx")
}
fn default_sheet_name() -> String {
    "Sheet1".to_string()
}
fn default_header_rows() -> usize {
    1
}
fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            table_path: default_table_path(),
            sheet_name: default_sheet_name(),
            header_rows: default_header_rows(),
            key_column: 0,
            columns: default_columns(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        if config.table_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.table_path = dir.join(&config.table_path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.table_path.as_os_str().is_empty() {
            return Err(CliError::config_error("table_path must not be empty"));
        }

        let name_len = self.sheet_name.chars().count();
        if self.sheet_name.trim().is_empty() || name_len > MAX_SHEET_NAME_LEN {
            return Err(CliError::config_error(format!(
                "Invalid sheet_name: '{}'. Must be 1 to {} characters.",
                self.sheet_name, MAX_SHEET_NAME_LEN
            )));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(CliError::config_error("max_upload_bytes must be > 0"));
        }

        if self.columns.is_empty() {
            return Err(CliError::config_error("columns must not be empty"));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.trim().is_empty() || !seen.insert(column.as_str()) {
                return Err(CliError::config_error(format!(
                    "Invalid columns: '{}' is blank or repeated",
                    column
                )));
            }
        }

        if self.key_column >= self.columns.len() {
            return Err(CliError::config_error(format!(
                "Invalid key_column: {}. Must name one of the {} columns.",
                self.key_column,
                self.columns.len()
            )));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Store settings derived from this config
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            path: self.table_path.clone(),
            sheet_name: self.sheet_name.clone(),
            layout: TableLayout {
                header_rows: self.header_rows,
                key_column: self.key_column,
                columns: self.columns.clone(),
            },
        }
    }
}
