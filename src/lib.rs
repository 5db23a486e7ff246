//! Tabular file format converter.
//!
//! Converts a small tabular data file between CSV, TSV, JSON, and XLSX. Input
//! is a raw byte buffer plus the original filename (used for extension
//! sniffing and output-name derivation); output is a byte buffer with a
//! derived filename and MIME type, ready for the hosting UI to hand to a
//! download mechanism. Every conversion passes through the same in-memory
//! [`Table`] so failures surface early with a single error type.
//!
//! # Examples
//!
//! ```rust
//! let csv = b"name,age\nAl,30\nBo,\n";
//! let out = tabform::convert(csv, "people.csv", "json")?;
//! assert_eq!(out.file_name, "people.json");
//! assert_eq!(out.mime_type, "application/json");
//! # Ok::<(), tabform::ConvertError>(())
//! ```
//!
//! The first few rows of any parsed input are available for preview without
//! serializing anything:
//!
//! ```rust
//! let table = tabform::parse_named(b"id,city\n1,Oslo\n2,Lima\n", "cities.csv")?;
//! assert_eq!(table.head(5).row_count(), 2);
//! # Ok::<(), tabform::ConvertError>(())
//! ```

mod delimited;
mod json;
mod xlsx;

pub mod error;
pub mod format;
pub mod pipeline;
pub mod table;

pub use error::{ConvertError, Stage};
pub use format::Format;
pub use pipeline::{convert, parse_named, Converted};
pub use table::{Cell, Column, Table};
