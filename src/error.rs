//! Error types for modhub.

use thiserror::Error;

/// Common error type for modhub.
#[derive(Error, Debug)]
pub enum ModHubError {
    /// Database error.
    ///
    /// Generic failure reported by the SQLite backend (query, schema, pool).
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A mod with the same id already exists.
    #[error("mod '{0}' already exists")]
    Duplicate(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ModHubError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ModHubError::DatabaseConnection(e.to_string())
            }
            _ => ModHubError::Database(e.to_string()),
        }
    }
}

/// Result type alias for modhub operations.
pub type Result<T> = std::result::Result<T, ModHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ModHubError::Validation("id is required".to_string());
        assert_eq!(err.to_string(), "validation error: id is required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ModHubError::NotFound("mod 'm1'".to_string());
        assert_eq!(err.to_string(), "mod 'm1' not found");
    }

    #[test]
    fn test_duplicate_error_display() {
        let err = ModHubError::Duplicate("m1".to_string());
        assert_eq!(err.to_string(), "mod 'm1' already exists");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ModHubError = io_err.into();
        assert!(matches!(err, ModHubError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_sqlx_pool_closed_conversion() {
        let err: ModHubError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, ModHubError::DatabaseConnection(_)));
    }

    #[test]
    fn test_sqlx_row_not_found_conversion() {
        let err: ModHubError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ModHubError::Database(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(ModHubError::Config("bad".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
