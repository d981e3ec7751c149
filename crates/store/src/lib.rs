//! Trait seams and backends for the content-addressed network.
//!
//! Defines the three contracts the reliability layer consumes:
//! - [`ContentStore`]: content-addressed add/get/pin/unpin primitives
//! - [`BackupTarget`]: third-party replication backends
//! - [`NameRouter`]: mutable-name publish/resolve primitives
//!
//! plus in-memory implementations for tests and embedded use.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::memory::{derive_address, MemoryStore};
pub use backends::router::MemoryNameRouter;
pub use error::{StoreError, StoreResult};
pub use traits::{
    AddedContent, BackupTarget, ContentStore, KeyType, NameRouter, PublicKeyInfo, PublishOptions,
    PublishedName, ResolvedName,
};
