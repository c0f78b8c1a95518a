//! Ingestion error types
//!
//! Parser-level failures. Each one surfaces to callers as
//! `AppError::ParseFailure` carrying this error's message.

use analystforge_common::errors::AppError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("PDF parse error for {path}: {message}")]
    PdfParseError { path: String, message: String },

    #[error("DOCX parse error for {path}: {message}")]
    DocxParseError { path: String, message: String },

    #[error("Spreadsheet error for {path}: {message}")]
    SpreadsheetError { path: String, message: String },

    #[error("CSV parse error for {path}: {message}")]
    CsvParseError { path: String, message: String },

    #[error("Invalid table in {path}: {message}")]
    InvalidTable { path: String, message: String },

    #[error("{path} is not valid UTF-8: {message}")]
    EncodingError { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IngestionError {
    /// Wrap a table-construction failure with the file it came from
    pub(crate) fn invalid_table(path: &Path, err: AppError) -> Self {
        let message = match err {
            AppError::ParseFailure { message } => message,
            other => other.to_string(),
        };
        IngestionError::InvalidTable {
            path: path.display().to_string(),
            message,
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(e: IngestionError) -> Self {
        AppError::ParseFailure {
            message: e.to_string(),
        }
    }
}
