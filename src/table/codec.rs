//! # XLSX Codec
//!
//! Converts between xlsx bytes and the in-memory `Workbook`. Reading goes
//! through calamine, writing through rust_xlsxwriter. Only cell values
//! survive a round trip.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook as XlsxWriter;

use super::cell::Cell;
use super::errors::{TableError, TableResult};
use super::sheet::{Sheet, Workbook};

/// Parse xlsx bytes into a workbook with every sheet loaded
pub fn decode(bytes: &[u8]) -> TableResult<Workbook> {
    let mut xlsx: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| TableError::MalformedTable(format!("not a readable xlsx file: {}", e)))?;

    let mut sheets = Vec::new();
    for name in xlsx.sheet_names() {
        let range = xlsx.worksheet_range(&name).map_err(|e| {
            TableError::MalformedTable(format!("failed to read sheet '{}': {}", name, e))
        })?;

        // calamine ranges begin at the first used cell; pad back to A1
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset as usize];
        for data_row in range.rows() {
            let mut row = vec![Cell::Empty; col_offset as usize];
            row.extend(data_row.iter().map(cell_from_data));
            trim_trailing_empty(&mut row);
            rows.push(row);
        }

        sheets.push(Sheet::with_rows(name, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Serialize every sheet of the workbook into xlsx bytes
pub fn encode(workbook: &Workbook) -> TableResult<Vec<u8>> {
    let mut writer = XlsxWriter::new();

    for sheet in &workbook.sheets {
        let worksheet = writer.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(write_failed)?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let r = u32::try_from(row_idx)
                .map_err(|_| TableError::WriteFailed(format!("row {} exceeds sheet limits", row_idx)))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let c = u16::try_from(col_idx).map_err(|_| {
                    TableError::WriteFailed(format!("column {} exceeds sheet limits", col_idx))
                })?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).map_err(write_failed)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n).map_err(write_failed)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b).map_err(write_failed)?;
                    }
                }
            }
        }
    }

    writer.save_to_buffer().map_err(write_failed)
}

fn write_failed(e: rust_xlsxwriter::XlsxError) -> TableError {
    TableError::WriteFailed(e.to_string())
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

fn trim_trailing_empty(row: &mut Vec<Cell>) {
    while row.last().is_some_and(Cell::is_empty) {
        row.pop();
    }
}
