//! Pinning coordinator: strategy dispatch, retry, queueing, backup fan-out.

use crate::error::{PinError, PinResult};
use crate::queue::PinQueue;
use futures::future::join_all;
use moor_core::{
    BackupState, ContentAddress, ContentRecord, JobId, PinJob, PinJobState, PinMetadata,
    PinPriority, PinState, PinStrategy, PinningConfig,
};
use moor_store::{BackupTarget, ContentStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Options for a pin request.
#[derive(Clone, Debug, Default)]
pub struct PinOptions {
    /// Execution strategy.
    pub strategy: PinStrategy,
    /// Queue priority for delayed execution.
    pub priority: PinPriority,
    /// Caller metadata.
    pub metadata: PinMetadata,
    /// Replicate to backup targets.
    pub backup: bool,
}

/// Options for an unpin request.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnpinOptions {
    /// Also remove the pin from backup targets.
    pub backup: bool,
}

/// Per-target result of a backup fan-out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupOutcome {
    /// Target the attempt was made against.
    pub target_id: String,
    /// Resulting state.
    pub state: BackupState,
}

impl BackupOutcome {
    /// Whether the target accepted the operation.
    pub fn succeeded(&self) -> bool {
        matches!(self.state, BackupState::Stored)
    }
}

/// Result of a pin request.
#[derive(Clone, Debug)]
pub struct PinOutcome {
    /// The pinned address.
    pub address: ContentAddress,
    /// Whether the content is pinned locally.
    pub pinned: bool,
    /// Whether the request was enqueued for later execution.
    pub queued: bool,
    /// Job id when the request was enqueued.
    pub job_id: Option<JobId>,
    /// Attempts the local pin consumed (0 when queued or backup-only).
    pub attempts: u32,
    /// Per-target backup outcomes.
    pub backups: Vec<BackupOutcome>,
}

impl PinOutcome {
    /// Fold this outcome into a content record for external persistence.
    pub fn apply_to(&self, record: &mut ContentRecord) {
        record.pin_state = if self.pinned {
            PinState::Pinned
        } else if self.queued {
            PinState::Queued
        } else {
            record.pin_state
        };
        for backup in &self.backups {
            record
                .backups
                .insert(backup.target_id.clone(), backup.state.clone());
        }
        record.touch();
    }
}

/// Result of an unpin request.
#[derive(Clone, Debug)]
pub struct UnpinOutcome {
    /// The unpinned address.
    pub address: ContentAddress,
    /// Whether the local unpin succeeded.
    pub unpinned: bool,
    /// Per-target backup outcomes.
    pub backups: Vec<BackupOutcome>,
}

impl UnpinOutcome {
    /// Fold this outcome into a content record for external persistence.
    pub fn apply_to(&self, record: &mut ContentRecord) {
        if self.unpinned {
            record.pin_state = PinState::Unpinned;
        }
        for backup in &self.backups {
            record.backups.remove(&backup.target_id);
        }
        record.touch();
    }
}

/// Pin status report for an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinStatusReport {
    /// Pinned on the local store.
    pub pinned: bool,
    /// Waiting in the delayed-pin queue.
    pub queued: bool,
    /// Zero-based queue position when queued.
    pub queue_position: Option<usize>,
}

/// Orchestrates pinning across the local store and backup targets.
///
/// Owns its queue explicitly; multiple independent coordinators can
/// coexist in one process.
pub struct PinningCoordinator {
    store: Arc<dyn ContentStore>,
    targets: Vec<Arc<dyn BackupTarget>>,
    config: PinningConfig,
    queue: Mutex<PinQueue>,
}

impl PinningCoordinator {
    /// Create a coordinator over a store and a set of backup targets.
    pub fn new(
        store: Arc<dyn ContentStore>,
        targets: Vec<Arc<dyn BackupTarget>>,
        config: PinningConfig,
    ) -> Self {
        Self {
            store,
            targets,
            config,
            queue: Mutex::new(PinQueue::new()),
        }
    }

    /// Pin an address, dispatching by strategy.
    pub async fn pin(&self, address: &str, options: PinOptions) -> PinResult<PinOutcome> {
        let address = ContentAddress::parse(address)?;

        match options.strategy {
            PinStrategy::Immediate => self.pin_now(address, &options).await,
            PinStrategy::Delayed => Ok(self.enqueue(address, options).await),
            PinStrategy::Conditional => {
                if self.pins_immediately(&options.metadata) {
                    self.pin_now(address, &options).await
                } else {
                    Ok(self.enqueue(address, options).await)
                }
            }
            PinStrategy::Backup => {
                let backups = self.backup_to_targets(&address, &options.metadata).await;
                Ok(PinOutcome {
                    address,
                    pinned: false,
                    queued: false,
                    job_id: None,
                    attempts: 0,
                    backups,
                })
            }
        }
    }

    /// Unpin an address locally and, optionally, from backup targets.
    ///
    /// Per-target failures are recorded, never propagated.
    pub async fn unpin(&self, address: &str, options: UnpinOptions) -> PinResult<UnpinOutcome> {
        let address = ContentAddress::parse(address)?;
        self.store.unpin(&address).await?;

        let backups = if options.backup && self.config.backup_enabled {
            self.unpin_from_targets(&address).await
        } else {
            Vec::new()
        };

        Ok(UnpinOutcome {
            address,
            unpinned: true,
            backups,
        })
    }

    /// Report pin and queue status for an address.
    pub async fn status(&self, address: &str) -> PinResult<PinStatusReport> {
        let address = ContentAddress::parse(address)?;
        let pinned = self.store.is_pinned(&address).await?;
        let queue_position = self.queue.lock().await.position(&address);
        Ok(PinStatusReport {
            pinned,
            queued: queue_position.is_some(),
            queue_position,
        })
    }

    /// Number of jobs waiting in the queue.
    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Pop and execute one queued job, returning it in its final state.
    ///
    /// Failures are captured on the job (terminal `Dead`), never raised, so
    /// one bad job cannot stall the polling loop.
    pub async fn process_next_job(&self) -> Option<PinJob> {
        let mut job = self.queue.lock().await.pop()?;
        job.state = PinJobState::Running;

        match self.pin_with_retry(&job.address).await {
            Ok(attempts) => {
                job.retry_count = attempts - 1;
                job.state = PinJobState::Pinned;
                tracing::debug!(job_id = %job.id, address = %job.address, "queued pin completed");
                if job.backup {
                    let outcomes = self.backup_to_targets(&job.address, &job.metadata).await;
                    for outcome in &outcomes {
                        if let BackupState::Failed { reason } = &outcome.state {
                            tracing::warn!(
                                job_id = %job.id,
                                target = %outcome.target_id,
                                reason = %reason,
                                "backup replication failed for queued pin"
                            );
                        }
                    }
                }
            }
            Err(err) => {
                job.retry_count = self.config.retry.max_retries;
                job.state = PinJobState::Dead;
                tracing::warn!(
                    job_id = %job.id,
                    address = %job.address,
                    error = %err,
                    "queued pin exhausted retries, job is dead"
                );
            }
        }

        Some(job)
    }

    /// Queue poll interval from the configuration.
    pub fn poll_interval(&self) -> std::time::Duration {
        self.config.pinning_delay()
    }

    fn pins_immediately(&self, metadata: &PinMetadata) -> bool {
        if self.config.auto_pin_critical && metadata.critical {
            return true;
        }
        metadata
            .size
            .map(|size| size < self.config.conditional_size_threshold)
            .unwrap_or(false)
    }

    async fn pin_now(
        &self,
        address: ContentAddress,
        options: &PinOptions,
    ) -> PinResult<PinOutcome> {
        let attempts = self.pin_with_retry(&address).await?;

        let backups = if options.backup && self.config.backup_enabled {
            self.backup_to_targets(&address, &options.metadata).await
        } else {
            Vec::new()
        };

        Ok(PinOutcome {
            address,
            pinned: true,
            queued: false,
            job_id: None,
            attempts,
            backups,
        })
    }

    async fn enqueue(&self, address: ContentAddress, options: PinOptions) -> PinOutcome {
        let job = PinJob::new(
            address.clone(),
            options.strategy,
            options.priority,
            options.metadata,
            options.backup && self.config.backup_enabled,
        );
        let job_id = job.id;
        self.queue.lock().await.push(job);
        tracing::debug!(job_id = %job_id, address = %address, "pin job enqueued");

        PinOutcome {
            address,
            pinned: false,
            queued: true,
            job_id: Some(job_id),
            attempts: 0,
            backups: Vec::new(),
        }
    }

    /// Execute a local pin with a bounded retry loop.
    ///
    /// Returns the number of attempts consumed. Exhausting the budget
    /// surfaces a single terminal error wrapping the last failure; the
    /// content is never reported pinned on an ambiguous outcome.
    async fn pin_with_retry(&self, address: &ContentAddress) -> PinResult<u32> {
        let policy = self.config.retry;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.store.pin(address).await {
                Ok(()) => return Ok(attempt),
                Err(err) if !err.is_retryable() => return Err(PinError::Store(err)),
                Err(err) => {
                    if attempt >= policy.max_attempts() {
                        return Err(PinError::RetryExhausted {
                            attempts: attempt,
                            source: err,
                        });
                    }
                    tracing::warn!(
                        address = %address,
                        attempt,
                        error = %err,
                        "pin attempt failed, retrying"
                    );
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }

    /// Replicate a pin to every enabled target independently.
    ///
    /// One target's failure never blocks or fails the others.
    async fn backup_to_targets(
        &self,
        address: &ContentAddress,
        metadata: &PinMetadata,
    ) -> Vec<BackupOutcome> {
        let attempts = self
            .targets
            .iter()
            .filter(|target| target.enabled())
            .map(|target| async move {
                match target.pin(address, metadata).await {
                    Ok(()) => BackupOutcome {
                        target_id: target.id().to_string(),
                        state: BackupState::Stored,
                    },
                    Err(err) => {
                        tracing::warn!(
                            target = target.id(),
                            address = %address,
                            error = %err,
                            "backup target pin failed"
                        );
                        BackupOutcome {
                            target_id: target.id().to_string(),
                            state: BackupState::Failed {
                                reason: err.to_string(),
                            },
                        }
                    }
                }
            });
        join_all(attempts).await
    }

    async fn unpin_from_targets(&self, address: &ContentAddress) -> Vec<BackupOutcome> {
        let attempts = self
            .targets
            .iter()
            .filter(|target| target.enabled())
            .map(|target| async move {
                match target.unpin(address).await {
                    Ok(()) => BackupOutcome {
                        target_id: target.id().to_string(),
                        state: BackupState::Stored,
                    },
                    Err(err) => {
                        tracing::warn!(
                            target = target.id(),
                            address = %address,
                            error = %err,
                            "backup target unpin failed"
                        );
                        BackupOutcome {
                            target_id: target.id().to_string(),
                            state: BackupState::Failed {
                                reason: err.to_string(),
                            },
                        }
                    }
                }
            });
        join_all(attempts).await
    }
}
