use async_trait::async_trait;
use bytes::Bytes;
use moor_core::ContentAddress;
use moor_store::{AddedContent, ContentStore, MemoryStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Store wrapper that counts fetches.
pub struct CountingStore {
    inner: MemoryStore,
    pub get_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            get_calls: AtomicUsize::new(0),
        }
    }

    pub async fn seed(&self, data: &'static [u8]) -> ContentAddress {
        self.inner
            .add(Bytes::from_static(data))
            .await
            .unwrap()
            .address
    }

    pub fn gets(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn add(&self, data: Bytes) -> StoreResult<AddedContent> {
        self.inner.add(data).await
    }

    async fn get(&self, address: &ContentAddress) -> StoreResult<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(address).await
    }

    async fn pin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.inner.pin(address).await
    }

    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.inner.unpin(address).await
    }

    async fn is_pinned(&self, address: &ContentAddress) -> StoreResult<bool> {
        self.inner.is_pinned(address).await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// Store that tracks how many fetches run simultaneously.
///
/// Each fetch holds an in-flight slot for a short sleep so overlapping
/// fetches are observable, and records the high-water mark.
pub struct GaugingStore {
    inner: MemoryStore,
    hold: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl GaugingStore {
    pub fn new(hold: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            hold,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn seed(&self, data: &'static [u8]) -> ContentAddress {
        self.inner
            .add(Bytes::from_static(data))
            .await
            .unwrap()
            .address
    }

    pub fn peak(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for GaugingStore {
    async fn add(&self, data: Bytes) -> StoreResult<AddedContent> {
        self.inner.add(data).await
    }

    async fn get(&self, address: &ContentAddress) -> StoreResult<Bytes> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.hold).await;
        let result = self.inner.get(address).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn pin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.inner.pin(address).await
    }

    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.inner.unpin(address).await
    }

    async fn is_pinned(&self, address: &ContentAddress) -> StoreResult<bool> {
        self.inner.is_pinned(address).await
    }

    fn backend_name(&self) -> &'static str {
        "gauging"
    }
}

/// Store whose fetch always fails with a retryable error.
pub struct UnreachableStore {
    pub get_attempts: AtomicUsize,
}

#[allow(dead_code)]
impl UnreachableStore {
    pub fn new() -> Self {
        Self {
            get_attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.get_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for UnreachableStore {
    async fn add(&self, _data: Bytes) -> StoreResult<AddedContent> {
        Err(StoreError::Backend("node unreachable".to_string()))
    }

    async fn get(&self, _address: &ContentAddress) -> StoreResult<Bytes> {
        self.get_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend("node unreachable".to_string()))
    }

    async fn pin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("node unreachable".to_string()))
    }

    async fn unpin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("node unreachable".to_string()))
    }

    async fn is_pinned(&self, _address: &ContentAddress) -> StoreResult<bool> {
        Err(StoreError::Backend("node unreachable".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

/// Store whose fetch hangs longer than any reasonable test timeout.
pub struct StalledStore {
    pub get_attempts: AtomicUsize,
}

#[allow(dead_code)]
impl StalledStore {
    pub fn new() -> Self {
        Self {
            get_attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.get_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for StalledStore {
    async fn add(&self, _data: Bytes) -> StoreResult<AddedContent> {
        Err(StoreError::Backend("stalled".to_string()))
    }

    async fn get(&self, _address: &ContentAddress) -> StoreResult<Bytes> {
        self.get_attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(StoreError::Backend("unreachable after sleep".to_string()))
    }

    async fn pin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("stalled".to_string()))
    }

    async fn unpin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("stalled".to_string()))
    }

    async fn is_pinned(&self, _address: &ContentAddress) -> StoreResult<bool> {
        Err(StoreError::Backend("stalled".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "stalled"
    }
}
