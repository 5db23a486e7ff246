//! Format tags for the four supported file formats.

use std::fmt;

use serde::Serialize;

/// Logical format of a tabular file. Derived once at input from the filename
/// extension and chosen once at output by the user; never changes mid-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl Format {
    /// Parses a user-facing format name ("csv", "TSV", ...) case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_extension(&name.trim().to_lowercase())
    }

    /// Maps a lowercased file extension to a format tag.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Detects the format of a file from its name: the substring after the
    /// last `.`, lowercased. Unsupported or missing extensions are never
    /// guessed at.
    ///
    /// # Examples
    /// ```
    /// use tabform::Format;
    ///
    /// assert_eq!(Format::detect("report.DATA.CSV"), Some(Format::Csv));
    /// assert_eq!(Format::detect("notes"), None);
    /// ```
    pub fn detect(file_name: &str) -> Option<Self> {
        Self::from_extension(&extension_of(file_name)?)
    }

    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }

    /// Registered MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Tsv => "text/tab-separated-values",
            Self::Json => "application/json",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Field delimiter for the delimited-text formats.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lowercased extension of a file name, if it has a non-empty one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_uses_final_extension_case_insensitively() {
        assert_eq!(Format::detect("report.DATA.CSV"), Some(Format::Csv));
        assert_eq!(Format::detect("export.tsv"), Some(Format::Tsv));
        assert_eq!(Format::detect("rows.JSON"), Some(Format::Json));
        assert_eq!(Format::detect("book.xlsx"), Some(Format::Xlsx));
    }

    #[test]
    fn detect_rejects_missing_or_unknown_extensions() {
        assert_eq!(Format::detect("notes"), None);
        assert_eq!(Format::detect("archive."), None);
        assert_eq!(Format::detect("scan.pdf"), None);
    }

    #[test]
    fn parse_trims_and_lowercases() {
        assert_eq!(Format::parse(" XLSX "), Some(Format::Xlsx));
        assert_eq!(Format::parse("pdf"), None);
    }

    #[test]
    fn mime_types_are_registered_values() {
        assert_eq!(Format::Csv.mime_type(), "text/csv");
        assert_eq!(Format::Tsv.mime_type(), "text/tab-separated-values");
        assert_eq!(Format::Json.mime_type(), "application/json");
        assert!(Format::Xlsx.mime_type().starts_with("application/vnd.openxmlformats"));
    }

    #[test]
    fn delimiters_cover_text_formats_only() {
        assert_eq!(Format::Csv.delimiter(), Some(b','));
        assert_eq!(Format::Tsv.delimiter(), Some(b'\t'));
        assert_eq!(Format::Json.delimiter(), None);
        assert_eq!(Format::Xlsx.delimiter(), None);
    }
}
