//! Verification error types.

use moor_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the verification engine.
///
/// A hash mismatch is NOT an error: it is reported as data on the
/// verification report, and policy is the caller's.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("malformed address: {0}")]
    MalformedAddress(moor_core::Error),

    #[error("hashing error: {0}")]
    Hashing(moor_core::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("verification failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

/// Result type for verification operations.
pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
