//! Cache Entry Module
//!
//! Defines the structure of individual cache entries with access metadata
//! used by the LRU and TTL machinery.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

// == Cache Entry ==
/// A single cached value with its access metadata.
///
/// Entries are owned by their container and only mutated through the
/// container's get/set/evict operations.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Timestamp of the most recent read (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Number of reads, starting at 1 on insert
    pub access_count: u64,
    /// Estimated serialized size in bytes (0 if estimation failed)
    pub size_bytes: usize,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: T, size_bytes: usize) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            inserted_at: now,
            last_accessed_at: now,
            access_count: 1,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's age exceeds the given TTL.
    ///
    /// Boundary condition: an entry is expired once `now - inserted_at` is
    /// greater than or equal to the TTL, so an entry read exactly at the TTL
    /// boundary is already gone.
    pub fn is_expired(&self, ttl_millis: u64) -> bool {
        current_timestamp_ms().saturating_sub(self.inserted_at) >= ttl_millis
    }

    // == Touch ==
    /// Records a read: bumps the access count and refreshes the access time.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }

    /// Age of the entry in milliseconds.
    pub fn age_millis(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.inserted_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
