//! Expiry Sweep Task
//!
//! Reads already drop expired entries lazily; this task reclaims memory held
//! by entries nobody reads again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SimpleCache;

/// Spawns a task that purges expired entries from `cache` every `interval`.
///
/// The sweep covers the whole store behind `cache`, including entries of
/// other app spaces sharing it.
///
/// # Arguments
/// * `cache` - Handle to the in-process cache; clones share its store
/// * `interval` - Time between sweeps; the first sweep runs after one interval
///
/// # Returns
/// A JoinHandle for the spawned task. The task runs until the handle is
/// aborted, typically during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = SimpleCache::new(&CacheConfig::default());
/// let sweeper = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_cleanup_task(cache: SimpleCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            app_space = cache.key_space().app_space(),
            "Starting expiry sweep every {:?}", interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
