//! Configuration Module
//!
//! Cache configuration with sensible defaults and optional loading from
//! environment variables.

use std::env;

/// Configuration for an entry cache instance.
///
/// All values can be overridden via environment variables; the defaults match
/// the general-purpose query cache profile (1000 entries, 5 minute TTL).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Time to live in milliseconds
    pub ttl_millis: u64,
    /// Compact large values before storing (snapshot cache)
    pub enable_compression: bool,
    /// Mirror entries to the durable key-value backend
    pub enable_persistence: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SRTO_CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `SRTO_CACHE_TTL_MILLIS` - TTL in milliseconds (default: 300000)
    /// - `SRTO_CACHE_COMPRESSION` - Enable compaction (default: false)
    /// - `SRTO_CACHE_PERSISTENCE` - Enable persistence (default: false)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("SRTO_CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            ttl_millis: env::var("SRTO_CACHE_TTL_MILLIS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            enable_compression: env::var("SRTO_CACHE_COMPRESSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_persistence: env::var("SRTO_CACHE_PERSISTENCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Sets the maximum number of entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the TTL in milliseconds.
    pub fn with_ttl_millis(mut self, ttl_millis: u64) -> Self {
        self.ttl_millis = ttl_millis;
        self
    }

    /// Enables or disables the persistence mirror.
    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.enable_persistence = enabled;
        self
    }

    /// Enables or disables value compaction.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            ttl_millis: 300_000, // 5 minutes
            enable_compression: false,
            enable_persistence: false,
        }
    }
}
