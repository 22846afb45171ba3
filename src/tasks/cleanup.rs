//! Expiry Sweep Task
//!
//! Background task that periodically sweeps expired entries out of the
//! persisted cache blob. Expiry is still checked lazily on every read;
//! the sweep only keeps the blob from accumulating dead entries between
//! reads.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MetricsCache;

/// Spawns a background task that periodically removes expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It acquires the cache write lock for each sweep.
///
/// # Arguments
/// * `cache` - Shared reference to the metrics cache
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during graceful
/// shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<MetricsCache>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.clean_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} entries", removed);
            } else {
                debug!("Expiry sweep: nothing to remove");
            }
        }
    })
}
