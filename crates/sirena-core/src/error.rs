//! Error types module
//!
//! Core error taxonomy for the Sirena application. An ingest request fails
//! end-to-end only on input validation or on the final store write; inference
//! stage failures are absorbed into fallback values before they can reach
//! this type (see the intake service).

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unsupported media field: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Data not found".to_string()),
            other => AppError::Database(other),
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidId(format!("Invalid ID format: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Database(_) => 500,
            AppError::Storage(_) => 500,
            AppError::Validation(_) => 400,
            AppError::UnsupportedMedia(_) => 400,
            AppError::InvalidId(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code for the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Validation(_) => "INVALID_INPUT",
            AppError::UnsupportedMedia(_) => "UNSUPPORTED_MEDIA",
            AppError::InvalidId(_) => "INVALID_ID",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message; internals of server-side failures are hidden.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::UnsupportedMedia(msg) => format!("Unsupported media field: {}", msg),
            AppError::InvalidId(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log level for this error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
            AppError::UnsupportedMedia(_) => LogLevel::Warn,
            AppError::Validation(_) | AppError::InvalidId(_) | AppError::NotFound(_) => {
                LogLevel::Debug
            }
        }
    }
}
