//! Entry Cache Module
//!
//! Generic LRU store with lazy TTL expiry, serialize-and-measure size
//! estimation, hit/miss statistics, and an optional persistence mirror.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::persist::PersistenceBackend;
use crate::cache::{CacheEntry, CacheStats, LruTracker, StatCounters};
use crate::config::CacheConfig;

/// Namespace prefix for persisted mirrors of cache entries.
pub const PERSIST_NAMESPACE: &str = "srto_cache_";

// == Entry Cache ==
/// Generic LRU cache with TTL expiry.
///
/// TTL is checked lazily on access, not by a background sweep: an expired
/// entry that is never read again keeps counting toward `total_items` and
/// `total_size` until it is read, swept externally, or the cache is cleared.
/// Callers that need bounded memory without reads can attach
/// [`crate::tasks::spawn_sweep_task`].
pub struct LruCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Recency tracker for eviction
    lru: LruTracker,
    /// Hit/miss/eviction counters
    counters: StatCounters,
    /// Capacity, TTL, and feature switches
    config: CacheConfig,
    /// Durable mirror, written on set when persistence is enabled
    persistence: Option<Arc<dyn PersistenceBackend>>,
    /// Prefix for persisted keys
    namespace: String,
}

impl<T> std::fmt::Debug for LruCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.entries.len())
            .field("max_size", &self.config.max_size)
            .field("ttl_millis", &self.config.ttl_millis)
            .field("persistence", &self.persistence.is_some())
            .finish()
    }
}

impl<T: Serialize + Clone> LruCache<T> {
    // == Constructor ==
    /// Creates a cache with the given configuration and no durable mirror.
    ///
    /// If `enable_persistence` is set without a backend attached, sets are
    /// kept in memory only.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: StatCounters::default(),
            config,
            persistence: None,
            namespace: PERSIST_NAMESPACE.to_string(),
        }
    }

    /// Creates a cache that mirrors entries to a durable backend.
    pub fn with_persistence(config: CacheConfig, backend: Arc<dyn PersistenceBackend>) -> Self {
        let mut cache = Self::new(config);
        cache.persistence = Some(backend);
        cache
    }

    /// Overrides the namespace used for persisted keys.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` when the key is unknown or the entry's age exceeds the
    /// configured TTL; expired entries are removed as a side effect and count
    /// as misses. On a hit the entry's access metadata is updated and it
    /// becomes the most recently used.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(self.config.ttl_millis),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.record_miss();
            debug!(key, "entry expired on read");
            return None;
        }

        let entry = self
            .entries
            .get_mut(key)
            .expect("entry checked present above");
        entry.touch();
        let value = entry.value.clone();
        self.counters.record_hit();
        self.lru.touch(key);
        Some(value)
    }

    // == Set ==
    /// Stores a value, evicting least-recently-used entries while the cache
    /// is at capacity.
    ///
    /// Overwriting an existing key never triggers eviction. Size estimation
    /// and persistence failures are logged and swallowed, so a set always
    /// lands in memory.
    pub fn set(&mut self, key: &str, value: T) {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite {
            while self.entries.len() >= self.config.max_size {
                match self.lru.pop_lru() {
                    Some(victim) => {
                        self.entries.remove(&victim);
                        self.counters.record_eviction();
                        debug!(key = %victim, "evicted least recently used entry");
                    }
                    None => break,
                }
            }
        }

        let size_bytes = self.estimate_size(&value);
        let entry = CacheEntry::new(value, size_bytes);

        if self.config.enable_persistence {
            self.persist_entry(key, &entry);
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
    }

    // == Delete ==
    /// Removes an entry and its persisted mirror; returns whether an entry
    /// existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.lru.remove(key);
        }
        if self.config.enable_persistence {
            if let Some(backend) = &self.persistence {
                if let Err(e) = backend.remove(&self.namespaced_key(key)) {
                    warn!(key, error = %e, "failed to remove persisted cache entry");
                }
            }
        }
        existed
    }

    // == Clear ==
    /// Empties the cache, resets all counters, and removes every persisted
    /// mirror under this cache's namespace.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.counters.reset();
        if self.config.enable_persistence {
            if let Some(backend) = &self.persistence {
                if let Err(e) = backend.remove_prefix(&self.namespace) {
                    warn!(error = %e, "failed to clear persisted cache namespace");
                }
            }
        }
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let total_size = self.entries.values().map(|e| e.size_bytes).sum();
        CacheStats::from_counters(&self.counters, self.entries.len(), total_size)
    }

    // == Sweep Expired ==
    /// Removes all entries older than the TTL without touching hit/miss
    /// counters. Returns the number removed.
    pub fn sweep_expired(&mut self) -> usize {
        let ttl = self.config.ttl_millis;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired_keys.len()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Access count recorded for a key, if present. Used by callers that
    /// surface per-entry diagnostics.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.access_count)
    }

    // == Internals ==
    /// Serialize-and-measure size estimation; a value that fails to
    /// serialize is counted as 0 bytes.
    fn estimate_size(&self, value: &T) -> usize {
        match serde_json::to_vec(value) {
            Ok(bytes) => bytes.len(),
            Err(e) => {
                warn!(error = %e, "size estimation failed, assuming 0 bytes");
                0
            }
        }
    }

    fn persist_entry(&self, key: &str, entry: &CacheEntry<T>) {
        let Some(backend) = &self.persistence else {
            return;
        };
        match serde_json::to_vec(entry) {
            Ok(bytes) => {
                if let Err(e) = backend.store(&self.namespaced_key(key), &bytes) {
                    warn!(key, error = %e, "failed to persist cache entry");
                }
            }
            Err(e) => warn!(key, error = %e, "failed to serialize cache entry for persistence"),
        }
    }

    fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::persist::MemoryBackend;
    use std::thread::sleep;
    use std::time::Duration;

    fn small_cache(max_size: usize, ttl_millis: u64) -> LruCache<String> {
        LruCache::new(
            CacheConfig::default()
                .with_max_size(max_size)
                .with_ttl_millis(ttl_millis),
        )
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = small_cache(100, 300_000);

        cache.set("outlet_1", "Bodega Central".to_string());

        assert_eq!(cache.get("outlet_1"), Some("Bodega Central".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_missing_records_miss() {
        let mut cache = small_cache(100, 300_000);

        assert_eq!(cache.get("missing"), None);

        let stats = cache.stats();
        assert_eq!(stats.miss_rate, 1.0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut cache = small_cache(100, 300_000);

        cache.set("k", "v1".to_string());
        cache.set("k", "v2".to_string());

        assert_eq!(cache.get("k"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = small_cache(3, 300_000);

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("c", "3".to_string());
        cache.set("d", "4".to_string());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
        assert_eq!(cache.stats().eviction_count, 1);
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let mut cache = small_cache(3, 300_000);

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("c", "3".to_string());

        // Reading "a" makes "b" the least recently used
        cache.get("a");
        cache.set("d", "4".to_string());

        assert!(cache.get("a").is_some());
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_ttl_lazy_expiry() {
        let mut cache = small_cache(100, 100);

        cache.set("k", "v".to_string());
        assert_eq!(cache.len(), 1);

        sleep(Duration::from_millis(150));

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0, "expired entry removed on read");
    }

    #[test]
    fn test_expired_but_unread_still_counted() {
        let mut cache = small_cache(100, 50);

        cache.set("unread", "v".to_string());
        sleep(Duration::from_millis(80));

        // No read has happened, so the entry still counts
        assert_eq!(cache.stats().total_items, 1);

        let removed = cache.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(cache.stats().total_items, 0);
    }

    #[test]
    fn test_access_count_increments_on_hit() {
        let mut cache = small_cache(100, 300_000);

        cache.set("k", "v".to_string());
        assert_eq!(cache.access_count("k"), Some(1));

        cache.get("k");
        cache.get("k");
        assert_eq!(cache.access_count("k"), Some(3));
    }

    #[test]
    fn test_hit_miss_accounting() {
        let mut cache = small_cache(100, 300_000);

        cache.set("k", "v".to_string());
        cache.get("k"); // hit
        cache.get("k"); // hit
        cache.get("nope"); // miss

        let stats = cache.stats();
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
        assert!((stats.miss_rate - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.hit_rate + stats.miss_rate, 1.0);
    }

    #[test]
    fn test_stats_total_size_tracks_estimates() {
        let mut cache = small_cache(100, 300_000);

        cache.set("k", "abc".to_string());

        // "abc" serializes to "\"abc\"" = 5 bytes
        assert_eq!(cache.stats().total_size, 5);
    }

    #[test]
    fn test_delete_reports_existence() {
        let mut cache = small_cache(100, 300_000);

        cache.set("k", "v".to_string());
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut cache = small_cache(2, 300_000);

        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.set("c", "3".to_string()); // evicts
        cache.get("a"); // miss (evicted)
        cache.get("c"); // hit

        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.miss_rate, 0.0);
        assert_eq!(stats.eviction_count, 0);
    }

    #[test]
    fn test_persistence_mirror_written_and_removed() {
        let backend = Arc::new(MemoryBackend::new());
        let mut cache: LruCache<String> = LruCache::with_persistence(
            CacheConfig::default().with_persistence(true),
            backend.clone(),
        );

        cache.set("territory_T1", "snapshot".to_string());
        assert!(backend
            .load("srto_cache_territory_T1")
            .unwrap()
            .is_some());

        cache.delete("territory_T1");
        assert!(backend
            .load("srto_cache_territory_T1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_clear_removes_namespace_only() {
        let backend = Arc::new(MemoryBackend::new());
        backend.store("unrelated_key", b"keep").unwrap();

        let mut cache: LruCache<String> = LruCache::with_persistence(
            CacheConfig::default().with_persistence(true),
            backend.clone(),
        );
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        cache.clear();

        assert!(backend.load("srto_cache_a").unwrap().is_none());
        assert!(backend.load("srto_cache_b").unwrap().is_none());
        assert!(backend.load("unrelated_key").unwrap().is_some());
    }
}
