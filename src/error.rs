//! Typed failures raised while converting annotation tables.
//!
//! Library functions return [`anyhow::Result`]; the variants below are the
//! domain errors wrapped inside it. Callers that need to branch on the failure
//! kind can recover them with `err.downcast_ref::<ConvertError>()`.

use std::path::PathBuf;
use std::{fmt, io};

/// A conversion failure.
#[derive(Debug)]
pub enum ConvertError {
    /// A data row carried fewer fields than the annotation layout requires.
    MalformedRow {
        /// 1-based line number in the input (comment lines included).
        line: u64,
        /// Number of fields actually present.
        found: usize,
        /// Number of fields the layout expects.
        expected: usize,
    },
    /// A field that has to be decoded is not valid UTF-8.
    InvalidText {
        /// 1-based line number in the input (comment lines included).
        line: u64,
        /// 1-based column number.
        field: usize,
    },
    /// The input could not be read or the output could not be written.
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// An ARFF document could not be parsed back.
    InvalidArff {
        line: usize,
        message: String,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_arff<M: Into<String>>(line: usize, message: M) -> Self {
        Self::InvalidArff {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRow {
                line,
                found,
                expected,
            } => write!(
                f,
                "malformed annotation row at line {line}: found {found} fields, expected {expected}"
            ),
            Self::InvalidText { line, field } => {
                write!(f, "invalid UTF-8 at line {line}, column {field}")
            }
            Self::Io { path, source } => write!(f, "I/O failure on {}: {source}", path.display()),
            Self::InvalidArff { line, message } => {
                write!(f, "invalid ARFF at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
