//! Content records, pin jobs, and their lifecycles.

use crate::address::ContentAddress;
use crate::hash::ContentDigest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Pinning strategy selecting how a pin request is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStrategy {
    /// Pin synchronously, with retry.
    #[default]
    Immediate,
    /// Enqueue for the background processor.
    Delayed,
    /// Immediate for critical or small content, delayed otherwise.
    Conditional,
    /// Replicate to backup targets only, skipping the local store.
    Backup,
}

/// Queue priority for delayed pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinPriority {
    Low,
    #[default]
    Normal,
    /// High-priority jobs jump to the head of the queue.
    High,
}

/// Caller-supplied metadata attached to a pin request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PinMetadata {
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Critical content is pinned immediately under the conditional strategy.
    #[serde(default)]
    pub critical: bool,
    /// Content size in bytes, when known at request time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Local pin state of a content record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinState {
    /// Not pinned and not queued.
    #[default]
    Unpinned,
    /// Waiting in the delayed-pin queue.
    Queued,
    /// Pinned on the local store.
    Pinned,
}

/// Replication state on a single backup target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum BackupState {
    /// Replicated successfully.
    Stored,
    /// The target reported a failure; siblings are unaffected.
    Failed { reason: String },
}

/// A content record tracked by the reliability layer.
///
/// The address is content-derived and never changes without the underlying
/// bytes changing; it is immutable after construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentRecord {
    address: ContentAddress,
    /// Content size in bytes.
    pub size: u64,
    /// Digest of the content, when verified.
    pub digest: Option<ContentDigest>,
    /// Local pin state.
    pub pin_state: PinState,
    /// Strategy the content was pinned under.
    pub strategy: PinStrategy,
    /// Queue priority.
    pub priority: PinPriority,
    /// Per-backup-target replication state, keyed by target id.
    pub backups: BTreeMap<String, BackupState>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ContentRecord {
    /// Create a new record for freshly ingested content.
    pub fn new(address: ContentAddress, size: u64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            address,
            size,
            digest: None,
            pin_state: PinState::Unpinned,
            strategy: PinStrategy::default(),
            priority: PinPriority::default(),
            backups: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the (immutable) content address.
    pub fn address(&self) -> &ContentAddress {
        &self.address
    }

    /// Record a mutation timestamp.
    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// Unique identifier for a pin job.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JobId({})", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pin job state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinJobState {
    /// Waiting in the queue.
    Pending,
    /// Currently being executed.
    Running,
    /// Successfully pinned (terminal).
    Pinned,
    /// Last attempt failed; eligible for retry while budget remains.
    Failed,
    /// Retry budget exhausted (terminal).
    Dead,
}

impl PinJobState {
    /// Check if the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Pinned | Self::Dead)
    }
}

/// A unit of pinning work consumed by the coordinator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinJob {
    /// Unique job identifier.
    pub id: JobId,
    /// Content to pin.
    pub address: ContentAddress,
    /// Strategy the job was created under.
    pub strategy: PinStrategy,
    /// Queue priority.
    pub priority: PinPriority,
    /// Attempts consumed so far. Bounded by the configured maximum;
    /// exceeding it moves the job to `Dead`, never to `Pinned`.
    pub retry_count: u32,
    /// Current state.
    pub state: PinJobState,
    /// Caller metadata.
    pub metadata: PinMetadata,
    /// Whether backup replication was requested.
    pub backup: bool,
    /// When the job was enqueued.
    #[serde(with = "time::serde::rfc3339")]
    pub enqueued_at: OffsetDateTime,
}

impl PinJob {
    /// Create a new pending job.
    pub fn new(
        address: ContentAddress,
        strategy: PinStrategy,
        priority: PinPriority,
        metadata: PinMetadata,
        backup: bool,
    ) -> Self {
        Self {
            id: JobId::new(),
            address,
            strategy,
            priority,
            retry_count: 0,
            state: PinJobState::Pending,
            metadata,
            backup,
            enqueued_at: OffsetDateTime::now_utc(),
        }
    }
}
