//! # Table Store
//!
//! The single xlsx file behind the API, treated as a flat table.
//!
//! - `cell`: cell values and their text/JSON renderings
//! - `sheet`: in-memory workbook and positional row operations
//! - `codec`: xlsx bytes ↔ workbook
//! - `store`: whole-file load → mutate → atomic persist cycle

pub mod cell;
pub mod codec;
pub mod errors;
pub mod sheet;
pub mod store;

pub use cell::Cell;
pub use errors::{TableError, TableResult};
pub use sheet::{keyed_cells, Row, Sheet, TableLayout, Workbook, DEFAULT_COLUMNS};
pub use store::{AppendedRow, NewRow, TableConfig, TableStore, UpsertOutcome};
