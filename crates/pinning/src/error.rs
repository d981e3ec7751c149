//! Pinning error types.

use moor_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the pinning coordinator.
#[derive(Debug, Error)]
pub enum PinError {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] moor_core::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("pin failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

/// Result type for pinning operations.
pub type PinResult<T> = std::result::Result<T, PinError>;
