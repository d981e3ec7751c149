//! Core domain types for the moor content reliability layer.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Content addresses and digest algorithms
//! - Content records and pin job lifecycle
//! - Mutable name records and update history
//! - Retry policies and component configuration

pub mod address;
pub mod config;
pub mod error;
pub mod hash;
pub mod name;
pub mod record;

pub use address::ContentAddress;
pub use config::{
    AppConfig, NameConfig, PinningConfig, RetryBackoff, RetryPolicy, VerificationConfig,
};
pub use error::{Error, Result};
pub use hash::{ContentDigest, ContentHasher, HashAlgorithm};
pub use name::{NameRecord, NameUpdate};
pub use record::{
    BackupState, ContentRecord, JobId, PinJob, PinJobState, PinMetadata, PinPriority, PinState,
    PinStrategy,
};
