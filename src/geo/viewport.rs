//! Viewport Cache Module
//!
//! Caches map data keyed by the viewport rectangle it was fetched for.
//! Continuous panning and zooming means identical rectangles rarely repeat,
//! so exact-key lookup alone has a near-zero hit rate; a cached rectangle is
//! also accepted when it covers at least 90% of the requested one. The
//! uncovered sliver may be slightly stale or missing, which the console
//! accepts in exchange for skipping a fetch.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::current_timestamp_ms;
use crate::geo::LatLngBounds;

/// Minimum fraction of the requested rectangle a cached one must cover.
pub const OVERLAP_THRESHOLD: f64 = 0.9;

/// Default entry lifetime; map data goes stale quickly while crews move.
pub const DEFAULT_VIEWPORT_TTL: Duration = Duration::from_secs(120);

// == Viewport Entry ==
#[derive(Debug, Clone)]
struct ViewportEntry<T> {
    bounds: LatLngBounds,
    data: Vec<T>,
    inserted_at: u64,
}

impl<T> ViewportEntry<T> {
    fn is_expired(&self, ttl_millis: u64) -> bool {
        current_timestamp_ms().saturating_sub(self.inserted_at) >= ttl_millis
    }
}

// == Viewport Cache ==
/// Geographic cache with overlap-based reuse.
///
/// There is no LRU bound here; expiry is amortized by sweeping aged entries
/// on every `set`.
#[derive(Debug)]
pub struct ViewportCache<T> {
    entries: HashMap<String, ViewportEntry<T>>,
    ttl_millis: u64,
}

impl<T: Clone> ViewportCache<T> {
    /// Creates a cache with the default 2 minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_VIEWPORT_TTL)
    }

    /// Creates a cache with a custom TTL (tests, unusual refresh profiles).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_millis: ttl.as_millis() as u64,
        }
    }

    // == Get ==
    /// Looks up data for a viewport.
    ///
    /// Tries the exact canonical key first; an exact entry past its TTL is
    /// removed and ignored. Failing that, any live cached rectangle covering
    /// at least [`OVERLAP_THRESHOLD`] of the requested one is reused.
    /// Disjoint rectangles never match.
    pub fn get(&mut self, bounds: &LatLngBounds) -> Option<Vec<T>> {
        let key = bounds.cache_key();

        if let Some(entry) = self.entries.get(&key) {
            if entry.is_expired(self.ttl_millis) {
                self.entries.remove(&key);
            } else {
                return Some(entry.data.clone());
            }
        }

        // Overlap acceptance: the first live rectangle with enough coverage
        for entry in self.entries.values() {
            if entry.is_expired(self.ttl_millis) {
                continue;
            }
            let coverage = entry.bounds.coverage_of(bounds);
            if coverage >= OVERLAP_THRESHOLD {
                debug!(coverage, "viewport served from overlapping rectangle");
                return Some(entry.data.clone());
            }
        }

        None
    }

    // == Set ==
    /// Stores data under the viewport's canonical key, then sweeps every
    /// entry older than the TTL.
    pub fn set(&mut self, bounds: LatLngBounds, data: Vec<T>) {
        let key = bounds.cache_key();
        self.entries.insert(
            key,
            ViewportEntry {
                bounds,
                data,
                inserted_at: current_timestamp_ms(),
            },
        );
        self.cleanup();
    }

    /// Removes all entries older than the TTL; returns the number removed.
    pub fn cleanup(&mut self) -> usize {
        let ttl = self.ttl_millis;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        before - self.entries.len()
    }

    /// Current number of cached rectangles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for ViewportCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
