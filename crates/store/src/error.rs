//! Store error types.

use thiserror::Error;

/// Errors surfaced by content stores, backup targets, and name routers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed address: {0}")]
    MalformedAddress(#[from] moor_core::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("key already exists for name: {0}")]
    KeyExists(String),

    #[error("no key for name: {0}")]
    KeyNotFound(String),

    #[error("name not published: {0}")]
    NameNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Malformed input and missing keys are permanent; timeouts and backend
    /// failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Backend(_) | Self::Io(_) | Self::NotFound(_)
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
