//! Error types for the export engine.

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Errors that abort an export before anything is delivered.
#[derive(Debug, Error)]
pub enum XlsxExportError {
    #[error("Invalid export configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse export configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("xlsx write error: {0}")]
    Xlsx(String),

    #[error("{kind} index overflow: {value}")]
    IndexOverflow { kind: &'static str, value: usize },

    #[error("DataFrame conversion error: {0}")]
    Frame(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<XlsxError> for XlsxExportError {
    fn from(err: XlsxError) -> Self {
        XlsxExportError::Xlsx(err.to_string())
    }
}

impl From<polars::prelude::PolarsError> for XlsxExportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        XlsxExportError::Frame(err.to_string())
    }
}
