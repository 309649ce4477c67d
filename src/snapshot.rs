//! Snapshot Cache Module
//!
//! Territory snapshot caching on top of the entry cache. Snapshots are large
//! and rarely change, so the cache is small (10 slots), long-lived (30
//! minutes), persisted, and stores the lossy compacted form only.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStats, LruCache, PersistenceBackend};
use crate::config::CacheConfig;
use crate::models::{CompactSnapshot, TerritorySnapshot};

/// Slots reserved for territory snapshots.
const SNAPSHOT_MAX_SIZE: usize = 10;
/// Territories change rarely; 30 minutes matches the console's profile.
const SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

// == Snapshot Cache ==
/// Domain cache for territory snapshots.
#[derive(Debug)]
pub struct SnapshotCache {
    inner: LruCache<CompactSnapshot>,
}

impl SnapshotCache {
    /// Creates a snapshot cache backed by the given persistence medium.
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Self {
        let config = CacheConfig::default()
            .with_max_size(SNAPSHOT_MAX_SIZE)
            .with_ttl_millis(SNAPSHOT_TTL.as_millis() as u64)
            .with_compression(true)
            .with_persistence(true);
        Self {
            inner: LruCache::with_persistence(config, backend),
        }
    }

    /// Creates a memory-only snapshot cache (tests).
    pub fn in_memory() -> Self {
        let config = CacheConfig::default()
            .with_max_size(SNAPSHOT_MAX_SIZE)
            .with_ttl_millis(SNAPSHOT_TTL.as_millis() as u64)
            .with_compression(true);
        Self {
            inner: LruCache::new(config),
        }
    }

    // == Get Snapshot ==
    /// Returns the compacted snapshot for a territory, if cached and live.
    ///
    /// The result is a reduced view; callers must never round-trip it back
    /// to the backend as a full snapshot write.
    pub fn get_snapshot(&mut self, territory_id: &str) -> Option<CompactSnapshot> {
        self.inner.get(&Self::key_for(territory_id))
    }

    // == Set Snapshot ==
    /// Compacts and stores a snapshot.
    pub fn set_snapshot(&mut self, territory_id: &str, snapshot: &TerritorySnapshot) {
        self.inner.set(&Self::key_for(territory_id), snapshot.compact());
    }

    /// Drops a territory's snapshot; returns whether one was cached.
    pub fn evict_snapshot(&mut self, territory_id: &str) -> bool {
        self.inner.delete(&Self::key_for(territory_id))
    }

    /// Statistics of the underlying entry cache.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    fn key_for(territory_id: &str) -> String {
        format!("territory_{territory_id}")
    }
}
