//! Custom error types for the cleaning pipeline.
//!
//! Only structural problems are errors here. Missing season files and
//! unparsable cell values are tolerated by the cleaners and never reach
//! this type.
//!
//! Errors are serializable so that a driver can emit them in a JSON report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A save was requested without a file name.
    #[error("Cannot save table: no file name was given")]
    MissingFileName,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cleaned table holds a value its consumers cannot accept.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A season label could not be parsed.
    #[error("Invalid season label '{0}' (expected '<start>_<end>', e.g. '2021_2022')")]
    InvalidSeason(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for report consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::MissingFileName => "MISSING_FILE_NAME",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::InvalidSeason(_) => "INVALID_SEASON",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error is a caller-contract violation rather than a data problem.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::MissingFileName | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_contract_violation(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(ProcessingError::MissingFileName.error_code(), "MISSING_FILE_NAME");
        assert_eq!(
            ProcessingError::ColumnNotFound("Squad".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_contract_violation() {
        assert!(ProcessingError::MissingFileName.is_contract_violation());
        assert!(
            ProcessingError::MissingFileName
                .with_context("Saving forecast")
                .is_contract_violation()
        );
        assert!(!ProcessingError::ColumnNotFound("x".to_string()).is_contract_violation());
        assert!(!ProcessingError::InvalidData("null key".to_string()).is_contract_violation());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProcessingError::ColumnNotFound("Attendance".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Attendance"));
    }

    #[test]
    fn test_with_context() {
        let error = ProcessingError::ColumnNotFound("Squad".to_string())
            .with_context("Cleaning season 2021_2022");
        assert!(error.to_string().contains("Cleaning season 2021_2022"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
