//! Cache Statistics Module
//!
//! Tracks hit/miss/eviction counters and exposes the derived rates.

use serde::Serialize;

// == Stat Counters ==
/// Raw counters maintained by the cache container.
#[derive(Debug, Clone, Default)]
pub struct StatCounters {
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries evicted by the LRU policy
    pub evictions: u64,
}

impl StatCounters {
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Stats ==
/// Point-in-time statistics snapshot returned to callers.
///
/// `hit_rate + miss_rate == 1.0` whenever at least one read has occurred;
/// both are 0.0 on a cache that has never been read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries (expired-but-unread entries still count)
    pub total_items: usize,
    /// Sum of estimated entry sizes in bytes
    pub total_size: usize,
    /// hits / (hits + misses), or 0.0 with no reads
    pub hit_rate: f64,
    /// misses / (hits + misses), or 0.0 with no reads
    pub miss_rate: f64,
    /// Entries evicted by the LRU policy since the last clear
    pub eviction_count: u64,
}

impl CacheStats {
    /// Builds a snapshot from raw counters and current container totals.
    pub fn from_counters(counters: &StatCounters, total_items: usize, total_size: usize) -> Self {
        let requests = counters.hits + counters.misses;
        let (hit_rate, miss_rate) = if requests > 0 {
            (
                counters.hits as f64 / requests as f64,
                counters.misses as f64 / requests as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            total_items,
            total_size,
            hit_rate,
            miss_rate,
            eviction_count: counters.evictions,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_zero_with_no_requests() {
        let stats = CacheStats::from_counters(&StatCounters::default(), 0, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.miss_rate, 0.0);
    }

    #[test]
    fn test_rates_sum_to_one() {
        let mut counters = StatCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();

        let stats = CacheStats::from_counters(&counters, 3, 120);
        assert_eq!(stats.hit_rate, 0.75);
        assert_eq!(stats.miss_rate, 0.25);
        assert_eq!(stats.hit_rate + stats.miss_rate, 1.0);
    }

    #[test]
    fn test_totals_passed_through() {
        let mut counters = StatCounters::default();
        counters.record_eviction();
        counters.record_eviction();

        let stats = CacheStats::from_counters(&counters, 7, 512);
        assert_eq!(stats.total_items, 7);
        assert_eq!(stats.total_size, 512);
        assert_eq!(stats.eviction_count, 2);
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut counters = StatCounters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_eviction();

        counters.reset();

        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
    }
}
