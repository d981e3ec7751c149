//! In-memory mutable-name router with ed25519 signing identities.

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    KeyType, NameRouter, PublicKeyInfo, PublishOptions, PublishedName, ResolvedName,
};
use async_trait::async_trait;
use base64::Engine;
use ed25519_dalek::SigningKey;
use moor_core::ContentAddress;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// A name's signing identity.
struct NameKey {
    key_type: KeyType,
    signing_key: SigningKey,
}

impl NameKey {
    fn generate(key_type: KeyType) -> Self {
        let mut rng = rand_core::OsRng;
        Self {
            key_type,
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    fn public_key_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD
            .encode(self.signing_key.verifying_key().as_bytes())
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({:?}, [REDACTED])", self.key_type)
    }
}

#[derive(Clone, Debug)]
struct PublishedRecord {
    address: ContentAddress,
    seq: u64,
}

/// In-memory name router.
///
/// Holds the authoritative name → address mapping with per-name
/// monotonically increasing sequence numbers.
pub struct MemoryNameRouter {
    keys: RwLock<HashMap<String, NameKey>>,
    records: RwLock<HashMap<String, PublishedRecord>>,
}

impl MemoryNameRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a key exists for the given name.
    pub async fn has_key(&self, name: &str) -> bool {
        self.keys.read().await.contains_key(name)
    }
}

impl Default for MemoryNameRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameRouter for MemoryNameRouter {
    async fn create_key(&self, name: &str, key_type: KeyType) -> StoreResult<PublicKeyInfo> {
        let mut keys = self.keys.write().await;
        if keys.contains_key(name) {
            return Err(StoreError::KeyExists(name.to_string()));
        }
        let key = NameKey::generate(key_type);
        let info = PublicKeyInfo {
            name: name.to_string(),
            key_type,
            public_key: key.public_key_base64(),
        };
        keys.insert(name.to_string(), key);
        Ok(info)
    }

    async fn remove_key(&self, name: &str) -> StoreResult<()> {
        let removed = self.keys.write().await.remove(name);
        if removed.is_none() {
            return Err(StoreError::KeyNotFound(name.to_string()));
        }
        // A name without its key can no longer be resolved.
        self.records.write().await.remove(name);
        Ok(())
    }

    async fn publish(
        &self,
        name: &str,
        address: &ContentAddress,
        _options: PublishOptions,
    ) -> StoreResult<PublishedName> {
        if !self.keys.read().await.contains_key(name) {
            return Err(StoreError::KeyNotFound(name.to_string()));
        }
        let mut records = self.records.write().await;
        let seq = records.get(name).map(|r| r.seq + 1).unwrap_or(1);
        records.insert(
            name.to_string(),
            PublishedRecord {
                address: address.clone(),
                seq,
            },
        );
        Ok(PublishedName {
            name: name.to_string(),
            seq,
        })
    }

    async fn resolve(&self, name: &str) -> StoreResult<ResolvedName> {
        self.records
            .read()
            .await
            .get(name)
            .map(|r| ResolvedName {
                address: r.address.clone(),
                seq: r.seq,
            })
            .ok_or_else(|| StoreError::NameNotFound(name.to_string()))
    }
}
