use async_trait::async_trait;
use moor_core::ContentAddress;
use moor_store::{
    KeyType, MemoryNameRouter, NameRouter, PublicKeyInfo, PublishOptions, PublishedName,
    ResolvedName, StoreResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Router wrapper that counts publish and resolve calls.
pub struct CountingRouter {
    pub inner: MemoryNameRouter,
    pub publish_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRouter {
    pub fn new() -> Self {
        Self {
            inner: MemoryNameRouter::new(),
            publish_calls: AtomicUsize::new(0),
            resolve_calls: AtomicUsize::new(0),
        }
    }

    pub fn resolves(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn publishes(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameRouter for CountingRouter {
    async fn create_key(&self, name: &str, key_type: KeyType) -> StoreResult<PublicKeyInfo> {
        self.inner.create_key(name, key_type).await
    }

    async fn remove_key(&self, name: &str) -> StoreResult<()> {
        self.inner.remove_key(name).await
    }

    async fn publish(
        &self,
        name: &str,
        address: &ContentAddress,
        options: PublishOptions,
    ) -> StoreResult<PublishedName> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.publish(name, address, options).await
    }

    async fn resolve(&self, name: &str) -> StoreResult<ResolvedName> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(name).await
    }
}
