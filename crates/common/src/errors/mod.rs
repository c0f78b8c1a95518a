//! Error types for AnalystForge
//!
//! Provides the error taxonomy shared by every crate:
//! - Distinct variants for each failure mode of the agent operations
//! - Machine-readable error codes
//! - Structured error responses for front-ends
//!
//! Underlying parser and transport errors are converted into these variants
//! once, at the operation boundary. Nothing here panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Loader errors (1xxx)
    UnsupportedFormat,
    ParseFailure,

    // Content store errors (2xxx)
    NoDataLoaded,

    // Visualization errors (3xxx)
    NotApplicable,
    NoNumericColumns,

    // External service errors (8xxx)
    ServiceError,

    // Internal errors (9xxx)
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::UnsupportedFormat => 1001,
            ErrorCode::ParseFailure => 1002,

            ErrorCode::NoDataLoaded => 2001,

            ErrorCode::NotApplicable => 3001,
            ErrorCode::NoNumericColumns => 3002,

            ErrorCode::ServiceError => 8001,

            ErrorCode::ConfigurationError => 9002,
        }
    }

    /// Stable lowercase label, used for metric labels
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedFormat => "unsupported_format",
            ErrorCode::ParseFailure => "parse_failure",
            ErrorCode::NoDataLoaded => "no_data_loaded",
            ErrorCode::NotApplicable => "not_applicable",
            ErrorCode::NoNumericColumns => "no_numeric_columns",
            ErrorCode::ServiceError => "service_error",
            ErrorCode::ConfigurationError => "configuration_error",
        }
    }
}

/// Application error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    // Loader errors
    #[error("Unsupported file type: {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("Error loading file: {message}")]
    ParseFailure { message: String },

    // Content store errors
    #[error("No data loaded.")]
    NoDataLoaded,

    // Visualization errors
    #[error("No data loaded for visualization.")]
    NotApplicable,

    #[error("No numeric columns to visualize.")]
    NoNumericColumns,

    // External service errors
    #[error("Error answering question: {message}")]
    ServiceError { message: String },

    // Internal errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            AppError::ParseFailure { .. } => ErrorCode::ParseFailure,
            AppError::NoDataLoaded => ErrorCode::NoDataLoaded,
            AppError::NotApplicable => ErrorCode::NotApplicable,
            AppError::NoNumericColumns => ErrorCode::NoNumericColumns,
            AppError::ServiceError { .. } => ErrorCode::ServiceError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
        }
    }

    /// Errors caused by the caller's input or the current session state,
    /// as opposed to the environment (service, configuration)
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AppError::ServiceError { .. } | AppError::Configuration { .. }
        )
    }

    /// Convenience constructor for parser failures
    pub fn parse(message: impl Into<String>) -> Self {
        AppError::ParseFailure {
            message: message.into(),
        }
    }
}

/// Structured error response for front-ends
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub numeric_code: u16,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = err.code();

        if err.is_client_error() {
            tracing::debug!(error = %err, code = ?code, "Client error");
        } else {
            tracing::warn!(error = %err, code = ?code, "Environment error");
        }

        ErrorResponse {
            status: "error".to_string(),
            error: ErrorDetails {
                code,
                numeric_code: code.as_code(),
                message: err.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ParseFailure {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::NoNumericColumns;
        assert_eq!(err.code(), ErrorCode::NoNumericColumns);
        assert_eq!(err.code().as_code(), 3002);
    }

    #[test]
    fn test_service_error_is_not_client_error() {
        let err = AppError::ServiceError {
            message: "connection refused".to_string(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Error answering question: connection refused");
    }

    #[test]
    fn test_error_response_shape() {
        let err = AppError::UnsupportedFormat {
            extension: ".exe".into(),
        };
        let response = ErrorResponse::from(&err);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(json["error"]["numeric_code"], 1001);
    }

    #[test]
    fn test_io_error_becomes_parse_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err = AppError::from(io);
        assert_eq!(err.code(), ErrorCode::ParseFailure);
    }
}
