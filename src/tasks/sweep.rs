//! TTL Sweep Task
//!
//! The entry cache expires lazily, on read; entries that are never read
//! again linger until swept. This optional background task bounds that
//! memory by sweeping a shared cache on a fixed interval. It changes nothing
//! about `get` semantics.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LruCache;

/// Spawns a background task that periodically removes expired entries from
/// a shared entry cache.
///
/// Returns the JoinHandle; abort it during shutdown.
pub fn spawn_sweep_task<T>(
    cache: Arc<RwLock<LruCache<T>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting TTL sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = cache.write().await;
                guard.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "TTL sweep removed expired entries");
            } else {
                debug!("TTL sweep found nothing expired");
            }
        }
    })
}
