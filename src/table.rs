//! In-memory tabular model shared by every parser and serializer.
//!
//! A [`Table`] is an ordered sequence of named columns, each an ordered
//! sequence of cells aligned by row index. Column order and row order are both
//! significant and preserved end-to-end. A table lives for the duration of a
//! single conversion call and carries no state across requests.

use serde::Serialize;
use serde_json::Number;

/// A single cell value. `serde_json::Number` preserves the integer/float
/// distinction so `1` does not come back out as `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Str(String),
    Number(Number),
    Bool(bool),
    Empty,
}

impl Cell {
    /// True for a missing value (pre-normalization).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text rendering used by the delimited-text serializers.
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// An ordered collection of equally-long, uniquely-named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Builds a table, enforcing the model invariants: every column has the
    /// same length and column names are unique.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, String> {
        if let Some(first) = columns.first() {
            let rows = first.cells.len();
            for column in &columns {
                if column.cells.len() != rows {
                    return Err(format!(
                        "column {:?} has {} cells, expected {}",
                        column.name,
                        column.cells.len(),
                        rows
                    ));
                }
            }
        }
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(format!("duplicate column name {:?}", column.name));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one row, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<&Cell>> {
        if idx >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[idx]).collect())
    }

    /// First `n` rows with the same columns. This is the preview hook the
    /// hosting UI renders after a conversion.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    cells: c.cells.iter().take(n).cloned().collect(),
                })
                .collect(),
        }
    }

    /// Per-column scalar type inference. A column whose non-empty cells are
    /// all text is upgraded when every such cell reads as a number, or as a
    /// `true`/`false` literal. Columns already holding native numbers or
    /// booleans are left alone. Every parser applies this so inference is
    /// consistent across source formats.
    pub fn infer_types(&mut self) {
        for column in &mut self.columns {
            infer_column(column);
        }
    }

    /// The normalization step: rewrites every missing cell to an empty
    /// string. Applied exactly once, after parsing and before serialization,
    /// so no serializer has to special-case missing data. Idempotent.
    pub fn fill_missing(&mut self) {
        for column in &mut self.columns {
            for cell in &mut column.cells {
                if cell.is_empty() {
                    *cell = Cell::Str(String::new());
                }
            }
        }
    }
}

fn infer_column(column: &mut Column) {
    let mut texts = Vec::new();
    for cell in &column.cells {
        match cell {
            Cell::Str(s) => texts.push(s.as_str()),
            Cell::Empty => {}
            _ => return,
        }
    }
    if texts.is_empty() {
        return;
    }
    if let Some(numbers) = texts
        .iter()
        .map(|t| parse_number(t))
        .collect::<Option<Vec<_>>>()
    {
        let mut numbers = numbers.into_iter();
        for cell in &mut column.cells {
            if matches!(cell, Cell::Str(_)) {
                if let Some(number) = numbers.next() {
                    *cell = Cell::Number(number);
                }
            }
        }
        return;
    }
    if texts.iter().all(|t| *t == "true" || *t == "false") {
        for cell in &mut column.cells {
            if let Cell::Str(s) = cell {
                *cell = Cell::Bool(s == "true");
            }
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    let float: f64 = text.parse().ok()?;
    number_from_f64(float)
}

/// Builds a JSON number from an f64, preferring the integer representation
/// when the value is whole. Spreadsheet cells come back as floats, so without
/// this a round-tripped `30` would print as `30.0`.
pub(crate) fn number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&value) {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}
