use async_trait::async_trait;
use bytes::Bytes;
use moor_core::{ContentAddress, PinMetadata};
use moor_store::{AddedContent, BackupTarget, ContentStore, MemoryStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Store wrapper that counts calls to every primitive.
pub struct CountingStore {
    inner: MemoryStore,
    pub pin_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            pin_calls: AtomicUsize::new(0),
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

    pub fn total_calls(&self) -> usize {
        self.pin_calls.load(Ordering::SeqCst) + self.get_calls.load(Ordering::SeqCst)
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
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
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

/// Store whose pin primitive always fails with a retryable error.
pub struct FailingStore {
    pub pin_attempts: AtomicUsize,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn new() -> Self {
        Self {
            pin_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn add(&self, _data: Bytes) -> StoreResult<AddedContent> {
        Err(StoreError::Backend("store is down".to_string()))
    }

    async fn get(&self, _address: &ContentAddress) -> StoreResult<Bytes> {
        Err(StoreError::Backend("store is down".to_string()))
    }

    async fn pin(&self, _address: &ContentAddress) -> StoreResult<()> {
        self.pin_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend("store is down".to_string()))
    }

    async fn unpin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("store is down".to_string()))
    }

    async fn is_pinned(&self, _address: &ContentAddress) -> StoreResult<bool> {
        Err(StoreError::Backend("store is down".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Store whose pin succeeds only after a configured number of failures.
pub struct FlakyStore {
    inner: MemoryStore,
    failures_remaining: AtomicUsize,
    pub pin_attempts: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_remaining: AtomicUsize::new(failures),
            pin_attempts: AtomicUsize::new(0),
        }
    }

    pub async fn seed(&self, data: &'static [u8]) -> ContentAddress {
        self.inner
            .add(Bytes::from_static(data))
            .await
            .unwrap()
            .address
    }
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn add(&self, data: Bytes) -> StoreResult<AddedContent> {
        self.inner.add(data).await
    }

    async fn get(&self, address: &ContentAddress) -> StoreResult<Bytes> {
        self.inner.get(address).await
    }

    async fn pin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.pin_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("transient failure".to_string()));
        }
        self.inner.pin(address).await
    }

    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.inner.unpin(address).await
    }

    async fn is_pinned(&self, address: &ContentAddress) -> StoreResult<bool> {
        self.inner.is_pinned(address).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// Backup target that records every pinned address.
pub struct RecordingTarget {
    id: String,
    pub pinned: Mutex<Vec<String>>,
    pub unpinned: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pinned: Mutex::new(Vec::new()),
            unpinned: Mutex::new(Vec::new()),
        }
    }

    pub fn pin_count(&self) -> usize {
        self.pinned.lock().unwrap().len()
    }
}

#[async_trait]
impl BackupTarget for RecordingTarget {
    fn id(&self) -> &str {
        &self.id
    }

    async fn pin(&self, address: &ContentAddress, _metadata: &PinMetadata) -> StoreResult<()> {
        self.pinned.lock().unwrap().push(address.to_string());
        Ok(())
    }

    async fn unpin(&self, address: &ContentAddress) -> StoreResult<()> {
        self.unpinned.lock().unwrap().push(address.to_string());
        Ok(())
    }
}

/// Backup target that always fails.
pub struct BrokenTarget {
    id: String,
}

#[allow(dead_code)]
impl BrokenTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl BackupTarget for BrokenTarget {
    fn id(&self) -> &str {
        &self.id
    }

    async fn pin(&self, _address: &ContentAddress, _metadata: &PinMetadata) -> StoreResult<()> {
        Err(StoreError::Backend("target unreachable".to_string()))
    }

    async fn unpin(&self, _address: &ContentAddress) -> StoreResult<()> {
        Err(StoreError::Backend("target unreachable".to_string()))
    }
}

/// Backup target that is configured but disabled.
pub struct DisabledTarget {
    id: String,
}

#[allow(dead_code)]
impl DisabledTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl BackupTarget for DisabledTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn enabled(&self) -> bool {
        false
    }

    async fn pin(&self, _address: &ContentAddress, _metadata: &PinMetadata) -> StoreResult<()> {
        panic!("disabled target must never be called");
    }

    async fn unpin(&self, _address: &ContentAddress) -> StoreResult<()> {
        panic!("disabled target must never be called");
    }
}
