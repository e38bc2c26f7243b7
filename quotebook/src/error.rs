//! Quotebook-specific error types

use std::time::Duration;
use thiserror::Error;
use shared::SharedError;

/// Failure reasons reported by a remote quote source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum QuotebookError {
    #[error("Invalid input: {source}")]
    InvalidInput { source: SharedError },

    #[error("Persisted state is malformed: {reason}")]
    MalformedPersistedState { reason: String },

    #[error("Import document is malformed: {reason}")]
    MalformedImportDocument { reason: String },

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] SourceError),

    #[error("Storage operation failed: {operation} on {key}: {message}")]
    StorageError {
        operation: String,
        key: String,
        message: String,
    },

    #[error("Configuration error: {field}: {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Scheduler is already running")]
    SchedulerAlreadyRunning,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl QuotebookError {
    pub fn invalid_input(source: SharedError) -> Self {
        QuotebookError::InvalidInput { source }
    }

    pub fn storage(operation: &str, key: &str, error: impl std::fmt::Display) -> Self {
        QuotebookError::StorageError {
            operation: operation.to_string(),
            key: key.to_string(),
            message: error.to_string(),
        }
    }

    pub fn config(field: &str, message: impl Into<String>) -> Self {
        QuotebookError::ConfigurationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Errors that should be shown to the caller immediately
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            QuotebookError::InvalidInput { .. } | QuotebookError::MalformedImportDocument { .. }
        )
    }
}

pub type QuotebookResult<T> = Result<T, QuotebookError>;
