//! # Table Store
//!
//! Row-level operations over one sheet of the backing xlsx file. Every
//! call runs a full cycle under the store mutex:
//!
//! 1. read and decode the file
//! 2. apply one change to the active sheet
//! 3. encode the whole workbook, write a sibling temp file, fsync, rename
//!
//! Keyed operations (`upsert`, `delete_by_key`) search and mutate inside the
//! same cycle, so concurrent requests cannot lose each other's updates.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};

use super::cell::Cell;
use super::codec;
use super::errors::{TableError, TableResult};
use super::sheet::{keyed_cells, Row, Sheet, TableLayout, Workbook};

/// Where the table lives and how its rows are read
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub path: PathBuf,
    pub sheet_name: String,
    pub layout: TableLayout,
}

impl TableConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet_name: "Sheet1".to_string(),
            layout: TableLayout::default(),
        }
    }
}

/// Fields accepted by create; the key is synthesized by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRow {
    pub novel: String,
    pub author: String,
    pub country: String,
}

/// Result of an append through `append_row`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendedRow {
    /// Position of the new row in the sheet
    pub index: usize,
    /// Synthetic key stored in the key column
    pub bookno: usize,
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A row with the key existed and was overwritten at this index
    Updated(usize),
    /// No row matched; a new row was appended at this index
    Created(usize),
}

/// Whether a cycle's change should reach disk
enum Change<T> {
    Commit(T),
    Discard(T),
}

/// Table Store Adapter over a single xlsx file
#[derive(Debug)]
pub struct TableStore {
    config: TableConfig,
    lock: Mutex<()>,
}

impl TableStore {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Every row after the header as a column-name → value object
    pub fn read_all(&self) -> TableResult<Vec<Map<String, Value>>> {
        let _guard = self.guard()?;
        let workbook = self.load()?;
        self.active_sheet(&workbook)?.records(&self.config.layout)
    }

    /// Total rows of the active sheet, header included
    pub fn row_count(&self) -> TableResult<usize> {
        let _guard = self.guard()?;
        let workbook = self.load()?;
        Ok(self.active_sheet(&workbook)?.row_count())
    }

    /// First row after the header rows whose `column` renders as `key`
    pub fn find_row_index(&self, key: &str, column: usize) -> TableResult<Option<usize>> {
        let _guard = self.guard()?;
        let workbook = self.load()?;
        let sheet = self.active_sheet(&workbook)?;
        Ok(sheet.find_row_index(key, column, self.config.layout.header_rows))
    }

    /// Append a row whose key is the sheet's row count before the append.
    ///
    /// The header counts toward that row count, so on a sheet holding a
    /// header and two rows the new key is 3.
    pub fn append_row(&self, fields: &NewRow) -> TableResult<AppendedRow> {
        let key_column = self.config.layout.key_column;
        let appended = self.transact(|sheet| {
            let bookno = sheet.row_count();
            let index = sheet.append_row(keyed_cells(
                Cell::Number(bookno as f64),
                vec![
                    Cell::text(&fields.novel),
                    Cell::text(&fields.author),
                    Cell::text(&fields.country),
                ],
                key_column,
            ));
            Ok(Change::Commit(AppendedRow { index, bookno }))
        })?;

        let bookno = appended.bookno.to_string();
        let row = appended.index.to_string();
        log_event_with_fields(
            Event::RowAppended,
            &[("bookno", bookno.as_str()), ("row", row.as_str())],
        );
        Ok(appended)
    }

    /// Overwrite the row at `index` with the four fields of `row`
    pub fn replace_row_at(&self, index: usize, row: &Row) -> TableResult<()> {
        let key_column = self.config.layout.key_column;
        self.transact(|sheet| {
            sheet.replace_row_at(index, row.to_cells(key_column))?;
            Ok(Change::Commit(()))
        })?;
        log_event_with_fields(Event::RowUpdated, &[("row", index.to_string().as_str())]);
        Ok(())
    }

    /// Remove the row at `index`
    pub fn delete_row_at(&self, index: usize) -> TableResult<()> {
        self.transact(|sheet| {
            sheet.delete_row_at(index)?;
            Ok(Change::Commit(()))
        })?;
        log_event_with_fields(Event::RowDeleted, &[("row", index.to_string().as_str())]);
        Ok(())
    }

    /// Overwrite the first row keyed `row.bookno` in place, or append `row`
    /// with its literal key in the key column
    pub fn upsert(&self, row: &Row) -> TableResult<UpsertOutcome> {
        let layout = &self.config.layout;
        let outcome = self.transact(|sheet| {
            let found = sheet.find_row_index(&row.bookno, layout.key_column, layout.header_rows);
            let outcome = match found {
                Some(index) => {
                    sheet.replace_row_at(index, row.to_cells(layout.key_column))?;
                    UpsertOutcome::Updated(index)
                }
                None => {
                    UpsertOutcome::Created(sheet.append_row(row.to_cells(layout.key_column)))
                }
            };
            Ok(Change::Commit(outcome))
        })?;

        let (event, index) = match outcome {
            UpsertOutcome::Updated(index) => (Event::RowUpdated, index),
            UpsertOutcome::Created(index) => (Event::RowAppended, index),
        };
        let index = index.to_string();
        log_event_with_fields(
            event,
            &[("bookno", row.bookno.as_str()), ("row", index.as_str())],
        );
        Ok(outcome)
    }

    /// Remove the first row keyed `key`. Returns the removed index, or
    /// `None` without touching the file when nothing matched.
    pub fn delete_by_key(&self, key: &str) -> TableResult<Option<usize>> {
        let layout = &self.config.layout;
        let removed = self.transact(|sheet| {
            match sheet.find_row_index(key, layout.key_column, layout.header_rows) {
                Some(index) => {
                    sheet.delete_row_at(index)?;
                    Ok(Change::Commit(Some(index)))
                }
                None => Ok(Change::Discard(None)),
            }
        })?;

        match removed {
            Some(index) => log_event_with_fields(
                Event::RowDeleted,
                &[("bookno", key), ("row", index.to_string().as_str())],
            ),
            None => log_event_with_fields(Event::RowNotFound, &[("bookno", key)]),
        }
        Ok(removed)
    }

    /// Overwrite the backing file with `bytes`. The content is not checked;
    /// a bad upload surfaces on the next read.
    pub fn replace_file(&self, bytes: &[u8]) -> TableResult<()> {
        let _guard = self.guard()?;
        self.persist(bytes)?;
        let size = bytes.len().to_string();
        let path = self.config.path.display().to_string();
        log_event_with_fields(
            Event::TableReplaced,
            &[("bytes", size.as_str()), ("path", path.as_str())],
        );
        Ok(())
    }

    /// Write a workbook holding only the header row.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn initialize(&self, force: bool) -> TableResult<()> {
        let _guard = self.guard()?;
        if !force && self.config.path.exists() {
            return Err(TableError::WriteFailed(format!(
                "{} already exists",
                self.config.path.display()
            )));
        }

        let header: Vec<Cell> = self
            .config
            .layout
            .columns
            .iter()
            .map(|c| Cell::text(c))
            .collect();
        let rows = if self.config.layout.header_rows > 0 {
            vec![header]
        } else {
            Vec::new()
        };
        let workbook = Workbook::new(vec![Sheet::with_rows(&self.config.sheet_name, rows)]);

        self.persist(&codec::encode(&workbook)?)?;
        let path = self.config.path.display().to_string();
        log_event_with_fields(Event::TableInitialized, &[("path", path.as_str())]);
        Ok(())
    }

    // ==================
    // Cycle
    // ==================

    fn guard(&self) -> TableResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| TableError::Internal("Lock poisoned".into()))
    }

    fn transact<T>(
        &self,
        apply: impl FnOnce(&mut Sheet) -> TableResult<Change<T>>,
    ) -> TableResult<T> {
        let _guard = self.guard()?;
        let mut workbook = self.load()?;
        let sheet = workbook
            .sheet_mut(&self.config.sheet_name)
            .ok_or_else(|| self.missing_sheet())?;

        match apply(sheet)? {
            Change::Commit(value) => {
                self.persist(&codec::encode(&workbook)?)?;
                Ok(value)
            }
            Change::Discard(value) => Ok(value),
        }
    }

    fn load(&self) -> TableResult<Workbook> {
        let bytes = fs::read(&self.config.path).map_err(|e| {
            TableError::FileUnavailable(format!("{}: {}", self.config.path.display(), e))
        })?;
        codec::decode(&bytes)
    }

    fn active_sheet<'a>(&self, workbook: &'a Workbook) -> TableResult<&'a Sheet> {
        workbook
            .sheet(&self.config.sheet_name)
            .ok_or_else(|| self.missing_sheet())
    }

    fn missing_sheet(&self) -> TableError {
        TableError::MalformedTable(format!(
            "sheet '{}' not found in {}",
            self.config.sheet_name,
            self.config.path.display()
        ))
    }

    /// Temp file, fsync, rename, fsync directory
    fn persist(&self, bytes: &[u8]) -> TableResult<()> {
        let path = &self.config.path;
        let tmp = temp_path(path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| io_failed("create directory", parent, e))?;
            }
        }

        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(io_failed("write", path, e));
        }

        sync_parent_dir(path)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn io_failed(action: &str, path: &Path, e: io::Error) -> TableError {
    TableError::WriteFailed(format!("failed to {} {}: {}", action, path.display(), e))
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> TableResult<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| io_failed("fsync directory", parent, e))
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> TableResult<()> {
    Ok(())
}
