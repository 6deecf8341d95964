use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use pauz_core::cache::Cache;

/// Spawns a task that drops expired entries every `interval` until shutdown.
///
/// Reads never depend on this task: expiry is also checked on `get`.
pub fn spawn_sweeper(
    cache: Arc<dyn Cache>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::debug!(interval_secs = interval.as_secs(), "Cache sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match cache.purge_expired().await {
                        Ok(0) => {}
                        Ok(removed) => tracing::trace!(removed, "Purged expired cache entries"),
                        Err(err) => tracing::warn!(error = %err, "Cache sweep failed"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Cache sweeper shutting down");
                    break;
                }
            }
        }
    })
}

/// Waits for a sweeper to finish. Returns false, after logging, if the task
/// panicked or was cancelled.
pub async fn join_sweeper(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Cache sweeper task failed");
            false
        }
    }
}
