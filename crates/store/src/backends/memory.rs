//! In-memory content-addressed backend.
//!
//! Derives CIDv0 addresses from content (sha2-256 multihash, base58), so the
//! same bytes always map to the same address. Used as the embedded backend
//! for tests and single-process deployments.

use crate::error::{StoreError, StoreResult};
use crate::traits::{AddedContent, ContentStore};
use async_trait::async_trait;
use bytes::Bytes;
use moor_core::ContentAddress;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// sha2-256 multihash prefix: code 0x12, length 0x20.
const MULTIHASH_SHA256: [u8; 2] = [0x12, 0x20];

/// Derive the CIDv0 address of a payload.
pub fn derive_address(data: &[u8]) -> ContentAddress {
    let digest = Sha256::digest(data);
    let mut multihash = Vec::with_capacity(34);
    multihash.extend_from_slice(&MULTIHASH_SHA256);
    multihash.extend_from_slice(&digest);
    let encoded = bs58::encode(multihash).into_string();
    // A sha2-256 multihash always base58-encodes to a valid 46-char CIDv0.
    ContentAddress::parse(encoded).expect("derived CIDv0 is structurally valid")
}

/// In-memory content-addressed store.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Bytes>>,
    pins: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            pins: RwLock::new(HashSet::new()),
        }
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn add(&self, data: Bytes) -> StoreResult<AddedContent> {
        let address = derive_address(&data);
        let size = data.len() as u64;
        self.objects
            .write()
            .await
            .insert(address.as_str().to_string(), data);
        Ok(AddedContent { address, size })
    }

    async fn get(&self, address: &ContentAddress) -> StoreResult<Bytes> {
        self.objects
            .read()
            .await
            .get(address.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    async fn pin(&self, address: &ContentAddress) -> StoreResult<()> {
        if !self.objects.read().await.contains_key(address.as_str()) {
            return Err(StoreError::NotFound(address.to_string()));
        }
        self.pins.write().await.insert(address.as_str().to_string());
        Ok(())
    }

    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.pins.write().await.remove(address.as_str());
        Ok(())
    }

    async fn is_pinned(&self, address: &ContentAddress) -> StoreResult<bool> {
        Ok(self.pins.read().await.contains(address.as_str()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
