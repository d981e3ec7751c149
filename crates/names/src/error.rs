//! Name service error types.

use moor_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the name service.
#[derive(Debug, Error)]
pub enum NameError {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] moor_core::Error),

    #[error("key already exists for name: {0}")]
    KeyExists(String),

    #[error("no key for name: {0}")]
    KeyNotFound(String),

    #[error("name not published: {0}")]
    NotPublished(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for NameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::KeyExists(name) => Self::KeyExists(name),
            StoreError::KeyNotFound(name) => Self::KeyNotFound(name),
            StoreError::NameNotFound(name) => Self::NotPublished(name),
            StoreError::MalformedAddress(e) => Self::MalformedAddress(e),
            other => Self::Store(other),
        }
    }
}

/// Result type for name operations.
pub type NameResult<T> = std::result::Result<T, NameError>;
