//! Custom error types for Pocketbook
//!
//! The analytics functions themselves are total and never fail; errors only
//! arise at the boundaries (parsing keys and dates, building ranges, reading
//! and writing the CSV exchange format, loading settings).

use thiserror::Error;

/// The main error type for Pocketbook operations
#[derive(Error, Debug)]
pub enum PocketbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reader/writer errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Rejected input (malformed dates, keys, ranges)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error at row {row}: {message}")]
    Import { row: usize, message: String },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl PocketbookError {
    /// Create a "not found" error for transaction files
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction file",
            identifier: identifier.into(),
        }
    }

    /// Create an import error for a 1-based data row
    pub fn import(row: usize, message: impl Into<String>) -> Self {
        Self::Import {
            row,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PocketbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PocketbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for PocketbookError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Pocketbook operations
pub type PocketbookResult<T> = Result<T, PocketbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PocketbookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PocketbookError::file_not_found("/tmp/missing.csv");
        assert_eq!(
            err.to_string(),
            "Transaction file not found: /tmp/missing.csv"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_import_error() {
        let err = PocketbookError::import(3, "negative amount");
        assert_eq!(err.to_string(), "Import error at row 3: negative amount");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PocketbookError = io_err.into();
        assert!(matches!(err, PocketbookError::Io(_)));
    }
}
