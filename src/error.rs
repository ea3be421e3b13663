//! Error handling for fixed-width reading operations.
//!
//! Open-time failures (missing files, unusable schemas) and per-row decode
//! failures are reported through [`FwfError`]. Unmapped categorical codes are
//! not errors; see [`crate::models::UnmappedCategory`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FwfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found at path: {path}")]
    NotFound { path: PathBuf },

    #[error("Malformed schema document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid schema for variable {variable}: {reason}")]
    Schema { variable: String, reason: String },

    #[error("Line {line_number}: field {field} has non-numeric value '{value}'")]
    NumericParse {
        line_number: usize,
        field: String,
        value: String,
    },

    #[error(
        "Line {line_number}: field {field} needs {needed} bytes but the line has {actual}"
    )]
    LineTooShort {
        line_number: usize,
        field: String,
        needed: usize,
        actual: usize,
    },

    #[error("Table has been closed")]
    Closed,

    #[error("Rows of this table were already consumed; reopen it to read again")]
    AlreadyConsumed,
}

impl FwfError {
    pub(crate) fn schema(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FwfError>;
