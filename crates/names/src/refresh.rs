//! Background auto-refresh scheduler.
//!
//! One task sweeps every registered name per tick, rather than one timer
//! per name, so resource usage stays bounded as the name count grows.

use crate::service::NameService;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running refresh scheduler.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal shutdown and wait for the scheduler to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the auto-refresh scheduler for a name service.
///
/// Each tick re-resolves every registered name with the cache bypassed.
/// Sweep failures are logged inside the sweep, never escape the loop.
pub fn spawn_refresh(service: Arc<NameService>) -> RefreshHandle {
    let (shutdown, mut stop) = watch::channel(false);
    let interval = service.refresh_interval();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so a freshly published
        // record is not re-resolved straight away.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    service.refresh_sweep().await;
                }
                _ = stop.changed() => {
                    if *stop.borrow() {
                        tracing::debug!("name refresh scheduler shutting down");
                        break;
                    }
                }
            }
        }
    });

    RefreshHandle { shutdown, task }
}
