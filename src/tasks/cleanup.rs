//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from every store.
//! Lookups already treat expired entries as dead; the sweep only reclaims memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a background task that periodically purges expired entries.
///
/// Stores created after the task starts are swept too, since the registry is
/// read on every run.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let caches = Arc::new(CacheManager::new());
/// let cleanup_handle = spawn_cleanup_task(caches.clone(), 30);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(caches: Arc<CacheManager>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_every(caches, Duration::from_secs(cleanup_interval_secs.max(1)))
}

/// Same as [`spawn_cleanup_task`] with an arbitrary interval.
pub fn spawn_cleanup_every(caches: Arc<CacheManager>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = caches.purge_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
