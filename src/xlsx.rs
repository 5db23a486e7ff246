//! XLSX parsing and serialization.
//!
//! Reads the first worksheet only, via `calamine`; writes a single worksheet
//! via `rust_xlsxwriter`. Native cell types are kept where the container has
//! them, so numbers stay numeric across the round-trip.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::table::{number_from_f64, Cell, Column, Table};

pub fn parse(data: &[u8]) -> Result<Table> {
    let format = Format::Xlsx;
    let mut workbook = Xlsx::new(Cursor::new(data)).map_err(|e| ConvertError::parse(format, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::Parse {
            format,
            message: "workbook has no sheets".into(),
        })?
        .map_err(|e| ConvertError::parse(format, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::empty());
    };
    let mut columns: Vec<Column> = header
        .iter()
        .map(|cell| Column {
            name: cell.to_string(),
            cells: Vec::new(),
        })
        .collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            columns[idx].cells.push(cell_from_data(cell));
        }
    }
    let mut table =
        Table::from_columns(columns).map_err(|message| ConvertError::Parse { format, message })?;
    table.infer_types();
    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Str(s.clone()),
        Data::Int(i) => Cell::Number((*i).into()),
        Data::Float(f) => number_from_f64(*f).map(Cell::Number).unwrap_or(Cell::Empty),
        Data::Bool(b) => Cell::Bool(*b),
        // Date cells fall back to their serial number; ISO text stays text.
        Data::DateTime(dt) => number_from_f64(dt.as_f64())
            .map(Cell::Number)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Str(s.clone()),
        Data::Error(e) => Cell::Str(e.to_string()),
    }
}

/// Writes header row plus data rows into a single worksheet and returns the
/// container's raw bytes. No text encoding is forced on the result.
pub fn write(table: &Table) -> Result<Vec<u8>> {
    let format = Format::Xlsx;
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        worksheet
            .write_string(0, col, column.name.as_str())
            .map_err(|e| ConvertError::serialize(format, e))?;
        for (row_idx, cell) in column.cells.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match cell {
                Cell::Str(s) => {
                    worksheet
                        .write_string(row, col, s.as_str())
                        .map_err(|e| ConvertError::serialize(format, e))?;
                }
                Cell::Number(n) => {
                    let value = n.as_f64().ok_or_else(|| ConvertError::Serialize {
                        format,
                        message: format!("number {n} cannot be written as a spreadsheet cell"),
                    })?;
                    worksheet
                        .write_number(row, col, value)
                        .map_err(|e| ConvertError::serialize(format, e))?;
                }
                Cell::Bool(b) => {
                    worksheet
                        .write_boolean(row, col, *b)
                        .map_err(|e| ConvertError::serialize(format, e))?;
                }
                Cell::Empty => {}
            }
        }
    }
    workbook
        .save_to_buffer()
        .map_err(|e| ConvertError::serialize(format, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column {
                name: "name".into(),
                cells: vec![Cell::Str("Al".into()), Cell::Str("Bo".into())],
            },
            Column {
                name: "age".into(),
                cells: vec![Cell::Number(Number::from(30)), Cell::Str(String::new())],
            },
            Column {
                name: "active".into(),
                cells: vec![Cell::Bool(true), Cell::Bool(false)],
            },
        ])
        .unwrap()
    }

    #[test]
    fn write_then_parse_keeps_values_and_types() {
        let bytes = write(&sample()).unwrap();
        let mut table = parse(&bytes).unwrap();
        table.fill_missing();
        assert_eq!(table.column_names(), vec!["name", "age", "active"]);
        assert_eq!(table.columns()[0].cells[0], Cell::Str("Al".into()));
        // Whole numbers come back from the float cell as integers.
        assert_eq!(table.columns()[1].cells[0], Cell::Number(Number::from(30)));
        assert_eq!(table.columns()[1].cells[1], Cell::Str(String::new()));
        assert_eq!(table.columns()[2].cells[0], Cell::Bool(true));
    }

    #[test]
    fn header_only_round_trips() {
        let table = Table::from_columns(vec![Column {
            name: "x".into(),
            cells: Vec::new(),
        }])
        .unwrap();
        let bytes = write(&table).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.column_names(), vec!["x"]);
        assert_eq!(parsed.row_count(), 0);
    }

    #[test]
    fn parse_rejects_non_spreadsheet_bytes() {
        let err = parse(b"not a zip container").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: Format::Xlsx, .. }));
    }
}
