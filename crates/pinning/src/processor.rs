//! Background queue processor.

use crate::coordinator::PinningCoordinator;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running queue processor.
///
/// Dropping the handle without calling [`stop`](Self::stop) leaves the
/// processor running until the runtime shuts down.
pub struct ProcessorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ProcessorHandle {
    /// Signal shutdown and wait for the processor to exit.
    pub async fn stop(self) {
        // Receiver may already be gone if the task exited on its own.
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the background processor for a coordinator.
///
/// Each tick pops and executes at most one queued job. Per-job failures
/// are captured on the job and logged, never propagated, so one bad job
/// cannot stall the loop.
pub fn spawn_processor(coordinator: Arc<PinningCoordinator>) -> ProcessorHandle {
    let (shutdown, mut stop) = watch::channel(false);
    let interval = coordinator.poll_interval();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if coordinator.process_next_job().await.is_none() {
                        tracing::trace!("pin queue empty");
                    }
                }
                _ = stop.changed() => {
                    if *stop.borrow() {
                        tracing::debug!("pin queue processor shutting down");
                        break;
                    }
                }
            }
        }
    });

    ProcessorHandle { shutdown, task }
}
