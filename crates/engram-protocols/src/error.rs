//! Memory store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    /// Caller-supplied input was rejected before any storage access.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The operation's cancellation token fired before completion.
    #[error("Operation cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = MemoryError::ValidationError("content must not be empty".to_string());
        let display = err.to_string();
        assert!(display.contains("Validation error"));
        assert!(display.contains("content must not be empty"));
    }

    #[test]
    fn test_storage_error() {
        let err = MemoryError::StorageError("disk full".to_string());
        let display = err.to_string();
        assert!(display.contains("Storage error"));
        assert!(display.contains("disk full"));
    }

    #[test]
    fn test_query_error() {
        let err = MemoryError::QueryError("invalid syntax".to_string());
        let display = err.to_string();
        assert!(display.contains("Query error"));
        assert!(display.contains("invalid syntax"));
    }

    #[test]
    fn test_connection_error() {
        let err = MemoryError::ConnectionError("connection refused".to_string());
        let display = err.to_string();
        assert!(display.contains("Connection error"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_cancelled_error() {
        let err = MemoryError::Cancelled;
        assert_eq!(err.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_error_debug() {
        let err = MemoryError::Cancelled;
        let debug = format!("{:?}", err);
        assert!(debug.contains("Cancelled"));
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<MemoryError> = vec![
            MemoryError::ValidationError("a".to_string()),
            MemoryError::StorageError("b".to_string()),
            MemoryError::QueryError("c".to_string()),
            MemoryError::ConnectionError("d".to_string()),
            MemoryError::Cancelled,
        ];

        for err in errors {
            let display = err.to_string();
            assert!(!display.is_empty());
        }
    }
}
