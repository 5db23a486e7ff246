//! JSON parsing and serialization.
//!
//! The JSON shape is a top-level array of flat objects, one per row. The
//! column set is the union of all keys across all objects, in order of first
//! appearance; objects missing a key contribute a missing value for that
//! column. Nested values are out of scope and rejected.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::table::{Cell, Column, Table};

pub fn parse(data: &[u8]) -> Result<Table> {
    let format = Format::Json;
    let value: Value =
        serde_json::from_slice(data).map_err(|e| ConvertError::parse(format, e))?;
    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(ConvertError::Parse {
                format,
                message: format!("expected a top-level array of objects, got {}", kind(&other)),
            })
        }
    };

    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<Cell>> = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let object = row.as_object().ok_or_else(|| ConvertError::Parse {
            format,
            message: format!("row {row_idx} is {}, expected an object", kind(row)),
        })?;
        for key in object.keys() {
            if !names.iter().any(|name| name == key) {
                names.push(key.clone());
                // Rows seen before this key appeared are missing it.
                columns.push(vec![Cell::Empty; row_idx]);
            }
        }
        for (col_idx, name) in names.iter().enumerate() {
            let cell = match object.get(name) {
                None | Some(Value::Null) => Cell::Empty,
                Some(Value::Bool(b)) => Cell::Bool(*b),
                Some(Value::Number(n)) => Cell::Number(n.clone()),
                Some(Value::String(s)) => Cell::Str(s.clone()),
                Some(other) => {
                    return Err(ConvertError::Parse {
                        format,
                        message: format!(
                            "column {name:?} in row {row_idx} holds {}, nested values are not supported",
                            kind(other)
                        ),
                    })
                }
            };
            columns[col_idx].push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| Column { name, cells })
        .collect();
    let mut table =
        Table::from_columns(columns).map_err(|message| ConvertError::Parse { format, message })?;
    table.infer_types();
    Ok(table)
}

/// Restores the table to an array of one flat object per row, pretty-printed
/// with 4-space indentation. Key order follows column order.
pub fn write(table: &Table) -> Result<Vec<u8>> {
    let format = Format::Json;
    let mut rows = Vec::with_capacity(table.row_count());
    for row_idx in 0..table.row_count() {
        let mut object = Map::new();
        for column in table.columns() {
            object.insert(column.name.clone(), cell_to_value(&column.cells[row_idx]));
        }
        rows.push(Value::Object(object));
    }
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    Value::Array(rows)
        .serialize(&mut serializer)
        .map_err(|e| ConvertError::serialize(format, e))?;
    Ok(buf)
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Str(s) => Value::String(s.clone()),
        Cell::Number(n) => Value::Number(n.clone()),
        Cell::Bool(b) => Value::Bool(*b),
        Cell::Empty => Value::String(String::new()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    #[test]
    fn parse_unions_keys_in_first_appearance_order() {
        let mut table = parse(br#"[{"a":1},{"b":2}]"#).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count(), 2);
        table.fill_missing();
        assert_eq!(table.columns()[0].cells[0], Cell::Number(Number::from(1)));
        assert_eq!(table.columns()[1].cells[0], Cell::Str(String::new()));
        assert_eq!(table.columns()[0].cells[1], Cell::Str(String::new()));
        assert_eq!(table.columns()[1].cells[1], Cell::Number(Number::from(2)));
    }

    #[test]
    fn parse_keeps_native_types_and_null_as_missing() {
        let table = parse(br#"[{"n":1.5,"b":true,"s":"x","m":null}]"#).unwrap();
        assert_eq!(table.columns()[0].cells[0].render(), "1.5");
        assert_eq!(table.columns()[1].cells[0], Cell::Bool(true));
        assert_eq!(table.columns()[2].cells[0], Cell::Str("x".into()));
        assert_eq!(table.columns()[3].cells[0], Cell::Empty);
    }

    #[test]
    fn parse_rejects_non_array_top_level() {
        let err = parse(br#"{"a":1}"#).unwrap_err();
        assert!(err.to_string().contains("top-level array"), "msg: {err}");
    }

    #[test]
    fn parse_rejects_non_object_rows() {
        let err = parse(b"[1,2]").unwrap_err();
        assert!(err.to_string().contains("expected an object"), "msg: {err}");
    }

    #[test]
    fn parse_rejects_nested_values() {
        let err = parse(br#"[{"a":{"b":1}}]"#).unwrap_err();
        assert!(err.to_string().contains("nested values"), "msg: {err}");
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let err = parse(b"[{").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { format: Format::Json, .. }));
    }

    #[test]
    fn write_uses_four_space_indent_and_column_order() {
        let mut table = parse(br#"[{"name":"Al","age":30}]"#).unwrap();
        table.fill_missing();
        let text = String::from_utf8(write(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"name\": \"Al\",\n        \"age\": 30\n    }\n]"
        );
    }

    #[test]
    fn write_serializes_empty_table_as_empty_array() {
        let table = parse(b"[]").unwrap();
        let text = String::from_utf8(write(&table).unwrap()).unwrap();
        assert_eq!(text, "[]");
    }
}
