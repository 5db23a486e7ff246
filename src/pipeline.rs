//! Conversion orchestrator: detect, parse, normalize, serialize.
//!
//! Stages run strictly in sequence with no retries and no partial recovery;
//! the first failure aborts the request with no output bytes. Nothing is
//! retained across calls, so concurrent conversions need no coordination.

use serde::Serialize;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format::{self, Format};
use crate::table::Table;
use crate::{delimited, json, xlsx};

/// Result bundle of one conversion: output bytes, derived filename, and the
/// MIME type to serve the download with. Handed to the hosting UI and
/// discarded after delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Converted {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

/// Converts `data` from the format detected in `file_name` into the target
/// format named by `target` (the user's selection, e.g. `"json"`).
///
/// # Examples
/// ```
/// let out = tabform::convert(b"a\tb\n1\t2\n", "grid.tsv", "csv")?;
/// assert_eq!(out.bytes, b"a,b\n1,2\n");
/// assert_eq!(out.file_name, "grid.csv");
/// # Ok::<(), tabform::ConvertError>(())
/// ```
pub fn convert(data: &[u8], file_name: &str, target: &str) -> Result<Converted> {
    let target = Format::parse(target)
        .ok_or_else(|| ConvertError::UnsupportedFormat(target.trim().to_string()))?;
    let table = parse_named(data, file_name)?;
    serialize_table(target, &table, file_name)
}

/// Detects, parses, and normalizes an input without serializing it, so the
/// caller can render a preview with [`Table::head`].
pub fn parse_named(data: &[u8], file_name: &str) -> Result<Table> {
    let source = Format::detect(file_name).ok_or_else(|| {
        let label =
            format::extension_of(file_name).unwrap_or_else(|| "none detected".to_string());
        ConvertError::UnsupportedFormat(label)
    })?;
    debug!(%source, file_name, bytes = data.len(), "detected input format");
    let mut table = match source {
        Format::Csv | Format::Tsv => delimited::parse(source, data),
        Format::Json => json::parse(data),
        Format::Xlsx => xlsx::parse(data),
    }?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "parsed input"
    );
    table.fill_missing();
    Ok(table)
}

/// Serializes an already-normalized table into `target`, deriving the output
/// filename from the original one.
pub fn serialize_table(target: Format, table: &Table, original_name: &str) -> Result<Converted> {
    let bytes = match target {
        Format::Csv | Format::Tsv => delimited::write(target, table),
        Format::Json => json::write(table),
        Format::Xlsx => xlsx::write(table),
    }?;
    let file_name = output_file_name(original_name, target);
    debug!(%target, file_name, bytes = bytes.len(), "serialized output");
    Ok(Converted {
        bytes,
        file_name,
        mime_type: target.mime_type().to_string(),
    })
}

/// Original base filename (final extension stripped) plus the target's
/// conventional extension.
pub fn output_file_name(original: &str, target: Format) -> String {
    let base = original
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(original);
    format!("{base}.{}", target.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    #[test]
    fn output_name_strips_final_extension_only() {
        assert_eq!(output_file_name("report.DATA.CSV", Format::Json), "report.DATA.json");
        assert_eq!(output_file_name("plain", Format::Xlsx), "plain.xlsx");
        assert_eq!(output_file_name("a.tsv", Format::Tsv), "a.tsv");
    }

    #[test]
    fn unsupported_target_fails_before_parsing() {
        let err = convert(b"a\n1\n", "a.csv", "pdf").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(ref name) if name == "pdf"));
        assert_eq!(err.stage(), Stage::Detecting);
    }

    #[test]
    fn missing_extension_is_reported_as_none_detected() {
        let err = parse_named(b"a\n1\n", "noext").unwrap_err();
        assert_eq!(err.to_string(), "unsupported format: none detected");
    }

    #[test]
    fn parse_named_normalizes_missing_values() {
        let table = parse_named(br#"[{"a":1},{"b":2}]"#, "rows.json").unwrap();
        assert_eq!(table.row(0).unwrap()[1].render(), "");
        assert_eq!(table.row(1).unwrap()[0].render(), "");
    }

    #[test]
    fn convert_reports_parse_failures_with_their_stage() {
        let err = convert(b"{\"not\":\"an array\"}", "rows.json", "csv").unwrap_err();
        assert_eq!(err.stage(), Stage::Parsing);
    }
}
