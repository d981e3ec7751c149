//! Trait seams for the content-addressed network and its collaborators.

use crate::error::StoreResult;
use async_trait::async_trait;
use bytes::Bytes;
use moor_core::{ContentAddress, PinMetadata};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of adding content to a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedContent {
    /// Content-derived address. The same bytes always yield the same address.
    pub address: ContentAddress,
    /// Content size in bytes.
    pub size: u64,
}

/// Content-addressed store abstraction (add/get/pin/unpin primitives).
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Add content, returning its content-derived address.
    async fn add(&self, data: Bytes) -> StoreResult<AddedContent>;

    /// Fetch content by address.
    async fn get(&self, address: &ContentAddress) -> StoreResult<Bytes>;

    /// Pin content so the store retains it indefinitely.
    ///
    /// Pinning an already-pinned address is a no-op success.
    async fn pin(&self, address: &ContentAddress) -> StoreResult<()>;

    /// Release a pin.
    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()>;

    /// Check whether an address is currently pinned.
    async fn is_pinned(&self, address: &ContentAddress) -> StoreResult<bool>;

    /// Static identifier for the backend type, used in logging.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity.
    ///
    /// The default implementation returns Ok(()), suitable for backends
    /// that need no connectivity check.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A third-party replication backend.
///
/// The pinning coordinator depends only on this contract; adding a new
/// replication service means implementing it, never touching the coordinator.
#[async_trait]
pub trait BackupTarget: Send + Sync + 'static {
    /// Stable identifier for this target.
    fn id(&self) -> &str;

    /// Whether the target is currently enabled. Disabled targets are
    /// skipped by fan-out without being treated as failures.
    fn enabled(&self) -> bool {
        true
    }

    /// Replicate a pin to this target.
    async fn pin(&self, address: &ContentAddress, metadata: &PinMetadata) -> StoreResult<()>;

    /// Remove a replicated pin from this target.
    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()>;
}

/// Signing key type for mutable names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Ed25519 (default).
    #[default]
    Ed25519,
}

/// Public half of a name's signing identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyInfo {
    /// Name the key was provisioned for.
    pub name: String,
    /// Key type.
    pub key_type: KeyType,
    /// Base64-encoded public key bytes.
    pub public_key: String,
}

/// Options for publishing a name.
#[derive(Clone, Copy, Debug, Default)]
pub struct PublishOptions {
    /// How long the published record remains valid.
    pub lifetime: Option<Duration>,
    /// Resolver cache TTL hint.
    pub ttl: Option<Duration>,
}

/// Result of publishing a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedName {
    /// The published name.
    pub name: String,
    /// Sequence number of this publish. Strictly increases per name.
    pub seq: u64,
}

/// Result of resolving a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedName {
    /// Current address the name points at.
    pub address: ContentAddress,
    /// Sequence number of the publish that set the address.
    pub seq: u64,
}

/// Mutable-name routing abstraction (publish/resolve primitives).
///
/// This is the network seam the name service drives; caching, refresh,
/// and history live above it.
#[async_trait]
pub trait NameRouter: Send + Sync + 'static {
    /// Provision a signing identity for a name.
    ///
    /// Fails with `StoreError::KeyExists` if the name is already taken;
    /// never a silent no-op.
    async fn create_key(&self, name: &str, key_type: KeyType) -> StoreResult<PublicKeyInfo>;

    /// Remove a name's signing identity.
    async fn remove_key(&self, name: &str) -> StoreResult<()>;

    /// Publish an address under a name, returning the new sequence number.
    async fn publish(
        &self,
        name: &str,
        address: &ContentAddress,
        options: PublishOptions,
    ) -> StoreResult<PublishedName>;

    /// Resolve a name to its current address and sequence number.
    async fn resolve(&self, name: &str) -> StoreResult<ResolvedName>;
}
