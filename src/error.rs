//! Error taxonomy for the conversion pipeline.

use std::fmt;

use thiserror::Error;

use crate::format::Format;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Pipeline stage in which a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detecting,
    Parsing,
    Serializing,
}

/// Error returned by any conversion entry point. Each variant maps to the
/// stage it was detected in; a failure at any stage aborts the whole request
/// with no output bytes.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Unrecognized or missing file extension, or a target format name
    /// outside the supported set.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed content for the detected input format.
    #[error("failed to parse {format} input: {message}")]
    Parse { format: Format, message: String },

    /// Failure while writing the target format.
    #[error("failed to write {format} output: {message}")]
    Serialize { format: Format, message: String },
}

impl ConvertError {
    /// Stage the failure occurred in, for user-visible reporting.
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedFormat(_) => Stage::Detecting,
            Self::Parse { .. } => Stage::Parsing,
            Self::Serialize { .. } => Stage::Serializing,
        }
    }

    pub(crate) fn parse(format: Format, err: impl fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn serialize(format: Format, err: impl fmt::Display) -> Self {
        Self::Serialize {
            format,
            message: err.to_string(),
        }
    }
}
