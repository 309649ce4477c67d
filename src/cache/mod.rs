//! Entry Cache Module
//!
//! Generic in-memory caching with lazy TTL expiration, LRU eviction, and an
//! optional durable mirror.

pub mod entry;
mod lru;
pub mod persist;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use persist::{DiskBackend, MemoryBackend, PersistenceBackend};
pub use stats::{CacheStats, StatCounters};
pub use store::{LruCache, PERSIST_NAMESPACE};
