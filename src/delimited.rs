//! CSV and TSV parsing and serialization.

use std::io::Cursor;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::table::{Cell, Column, Table};

/// Parses delimited text with the format's delimiter. The first row is the
/// header; empty fields become missing values. Ragged rows and invalid UTF-8
/// surface as parse errors.
pub fn parse(format: Format, data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(format.delimiter().unwrap_or(b','))
        .from_reader(Cursor::new(data));

    let headers = reader
        .headers()
        .map_err(|e| ConvertError::parse(format, e))?
        .clone();
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column {
            name: name.to_string(),
            cells: Vec::new(),
        })
        .collect();
    for record in reader.records() {
        let record = record.map_err(|e| ConvertError::parse(format, e))?;
        for (idx, field) in record.iter().enumerate() {
            columns[idx].cells.push(if field.is_empty() {
                Cell::Empty
            } else {
                Cell::Str(field.to_string())
            });
        }
    }
    let mut table =
        Table::from_columns(columns).map_err(|message| ConvertError::Parse { format, message })?;
    table.infer_types();
    Ok(table)
}

/// Writes a header row followed by data rows, quoting only when a field
/// contains the delimiter, a quote, or a newline. UTF-8, trailing newline.
pub fn write(format: Format, table: &Table) -> Result<Vec<u8>> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter().unwrap_or(b','))
        .from_writer(Vec::new());
    writer
        .write_record(table.column_names())
        .map_err(|e| ConvertError::serialize(format, e))?;
    for row_idx in 0..table.row_count() {
        let row: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.cells[row_idx].render())
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| ConvertError::serialize(format, e))?;
    }
    writer
        .flush()
        .map_err(|e| ConvertError::serialize(format, e))?;
    writer
        .into_inner()
        .map_err(|e| ConvertError::serialize(format, e))
}
