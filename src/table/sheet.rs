//! # Sheet Model
//!
//! In-memory form of a workbook and the positional row operations the
//! table store applies between a load and a persist.

use serde_json::{Map, Value};

use super::cell::Cell;
use super::errors::{TableError, TableResult};

/// Column names written by `init` and used when a sheet carries no header
pub const DEFAULT_COLUMNS: [&str; 4] = ["bookno", "novel", "author", "country"];

/// One record with the four fields the API reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub bookno: String,
    pub novel: String,
    pub author: String,
    pub country: String,
}

impl Row {
    pub fn new(
        bookno: impl Into<String>,
        novel: impl Into<String>,
        author: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            bookno: bookno.into(),
            novel: novel.into(),
            author: author.into(),
            country: country.into(),
        }
    }

    /// All four fields as text cells, `bookno` placed at `key_column`
    pub fn to_cells(&self, key_column: usize) -> Vec<Cell> {
        keyed_cells(
            Cell::text(&self.bookno),
            vec![
                Cell::text(&self.novel),
                Cell::text(&self.author),
                Cell::text(&self.country),
            ],
            key_column,
        )
    }
}

/// Lay `fields` out left to right with `key` inserted at `key_column`.
/// Gaps before a key column past the last field stay empty.
pub fn keyed_cells(key: Cell, mut fields: Vec<Cell>, key_column: usize) -> Vec<Cell> {
    if fields.len() < key_column {
        fields.resize(key_column, Cell::Empty);
    }
    fields.insert(key_column, key);
    fields
}

/// How rows of a sheet are interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Leading rows that key search skips and List excludes.
    /// When non-zero, row 0 names the columns.
    pub header_rows: usize,
    /// Column compared against the key
    pub key_column: usize,
    /// Column names used when `header_rows == 0`, and the header `init` writes
    pub columns: Vec<String>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            key_column: 0,
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A named grid of cells. Rows may be ragged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Total rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First row at or after `start` whose `column` renders exactly as `key`
    pub fn find_row_index(&self, key: &str, column: usize, start: usize) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, row)| {
                row.get(column)
                    .map(|cell| cell.to_text() == key)
                    .unwrap_or(false)
            })
            .map(|(idx, _)| idx)
    }

    /// Add a row at the end and return its index
    pub fn append_row(&mut self, cells: Vec<Cell>) -> usize {
        self.rows.push(cells);
        self.rows.len() - 1
    }

    /// Swap the row at `index` for `cells`, leaving every other row in place
    pub fn replace_row_at(&mut self, index: usize, cells: Vec<Cell>) -> TableResult<()> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(TableError::RowOutOfRange(index))?;
        *row = cells;
        Ok(())
    }

    /// Remove the row at `index`; later rows shift up by one
    pub fn delete_row_at(&mut self, index: usize) -> TableResult<Vec<Cell>> {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfRange(index));
        }
        Ok(self.rows.remove(index))
    }

    /// Rows after the header as column-name → value objects, in sheet order
    pub fn records(&self, layout: &TableLayout) -> TableResult<Vec<Map<String, Value>>> {
        let names = self.column_names(layout)?;
        let mut records = Vec::with_capacity(self.rows.len().saturating_sub(layout.header_rows));

        for (idx, row) in self.rows.iter().enumerate().skip(layout.header_rows) {
            let mut record = Map::with_capacity(names.len());
            for (col, name) in names.iter().enumerate() {
                let value = row.get(col).map(Cell::to_json).unwrap_or(Value::Null);
                record.insert(name.clone(), value);
            }
            if let Some(col) = row.iter().skip(names.len()).position(|c| !c.is_empty()) {
                return Err(TableError::MalformedTable(format!(
                    "row {} has a value in column {} outside the {} declared columns",
                    idx + 1,
                    names.len() + col + 1,
                    names.len()
                )));
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Column names declared by the header row, or the layout defaults
    pub fn column_names(&self, layout: &TableLayout) -> TableResult<Vec<String>> {
        if layout.header_rows == 0 {
            return Ok(layout.columns.clone());
        }
        let Some(header) = self.rows.first() else {
            return Ok(Vec::new());
        };

        let width = header
            .iter()
            .rposition(|c| !c.is_empty())
            .map_or(0, |last| last + 1);

        let mut names: Vec<String> = Vec::with_capacity(width);
        for (col, cell) in header[..width].iter().enumerate() {
            let name = cell.to_text();
            if name.trim().is_empty() {
                return Err(TableError::MalformedTable(format!(
                    "header cell in column {} is empty",
                    col + 1
                )));
            }
            if names.contains(&name) {
                return Err(TableError::MalformedTable(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            names.push(name);
        }
        Ok(names)
    }
}

/// Every sheet of one workbook file, in file order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header() -> Vec<Cell> {
        DEFAULT_COLUMNS.iter().map(|c| Cell::from(*c)).collect()
    }

    fn books() -> Sheet {
        Sheet::with_rows(
            "Sheet1",
            vec![
                header(),
                vec![Cell::Number(1.0), "A".into(), "X".into(), "C1".into()],
                vec![Cell::Number(2.0), "B".into(), "Y".into(), "C2".into()],
            ],
        )
    }

    #[test]
    fn test_find_skips_header_rows() {
        let mut sheet = books();
        sheet.rows[0][0] = Cell::text("2");
        assert_eq!(sheet.find_row_index("2", 0, 1), Some(2));
        assert_eq!(sheet.find_row_index("2", 0, 0), Some(0));
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut sheet = books();
        sheet.append_row(Row::new("1", "dup", "dup", "dup").to_cells(0));
        assert_eq!(sheet.find_row_index("1", 0, 1), Some(1));
    }

    #[test]
    fn test_find_missing_key_and_short_rows() {
        let mut sheet = books();
        sheet.append_row(vec![]);
        assert_eq!(sheet.find_row_index("9", 0, 1), None);
        assert_eq!(sheet.find_row_index("Y", 2, 1), Some(2));
        assert_eq!(sheet.find_row_index("Y", 7, 1), None);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut sheet = books();
        sheet
            .replace_row_at(1, Row::new("1", "A2", "X2", "C9").to_cells(0))
            .unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.rows[1][1], Cell::text("A2"));
        assert_eq!(sheet.rows[2][1], Cell::text("B"));
    }

    #[test]
    fn test_delete_shifts_rows_up() {
        let mut sheet = books();
        let removed = sheet.delete_row_at(1).unwrap();
        assert_eq!(removed[1], Cell::text("A"));
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[1][1], Cell::text("B"));
        assert!(matches!(sheet.delete_row_at(5), Err(TableError::RowOutOfRange(5))));
    }

    #[test]
    fn test_records_use_header_names() {
        let records = books().records(&TableLayout::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            Value::Object(records[1].clone()),
            json!({"bookno": 2, "novel": "B", "author": "Y", "country": "C2"})
        );
    }

    #[test]
    fn test_records_pad_short_rows_with_null() {
        let mut sheet = books();
        sheet.append_row(vec![Cell::Number(3.0), "C".into()]);
        let records = sheet.records(&TableLayout::default()).unwrap();
        assert_eq!(records[2]["country"], Value::Null);
    }

    #[test]
    fn test_records_without_header_use_layout_columns() {
        let layout = TableLayout {
            header_rows: 0,
            ..TableLayout::default()
        };
        let sheet = Sheet::with_rows("Sheet1", vec![Row::new("5", "N", "A", "C").to_cells(0)]);
        let records = sheet.records(&layout).unwrap();
        assert_eq!(records[0]["bookno"], json!("5"));
    }

    #[test]
    fn test_value_outside_header_is_malformed() {
        let mut sheet = books();
        sheet.rows[2].push(Cell::text("stray"));
        let err = sheet.records(&TableLayout::default()).unwrap_err();
        assert!(matches!(err, TableError::MalformedTable(_)));
    }

    #[test]
    fn test_duplicate_or_blank_header_is_malformed() {
        let mut sheet = books();
        sheet.rows[0][3] = Cell::text("novel");
        assert!(sheet.column_names(&TableLayout::default()).is_err());

        let mut sheet = books();
        sheet.rows[0][1] = Cell::Empty;
        assert!(sheet.column_names(&TableLayout::default()).is_err());
    }

    #[test]
    fn test_empty_sheet_has_no_records() {
        let sheet = Sheet::new("Sheet1");
        assert!(sheet.records(&TableLayout::default()).unwrap().is_empty());
    }

    #[test]
    fn test_key_lands_in_key_column() {
        let row = Row::new("5", "N", "Au", "Co");
        assert_eq!(row.to_cells(0)[0], Cell::text("5"));

        let cells = row.to_cells(2);
        assert_eq!(
            cells,
            vec![
                Cell::text("N"),
                Cell::text("Au"),
                Cell::text("5"),
                Cell::text("Co")
            ]
        );

        let mut sheet = Sheet::new("Sheet1");
        sheet.append_row(cells);
        assert_eq!(sheet.find_row_index("5", 2, 0), Some(0));
    }

    #[test]
    fn test_key_column_past_fields_pads_with_empty() {
        let cells = keyed_cells(Cell::Number(9.0), vec![Cell::text("a")], 3);
        assert_eq!(
            cells,
            vec![Cell::text("a"), Cell::Empty, Cell::Empty, Cell::Number(9.0)]
        );
    }
}
