//! srto-cache - Client-side caching and invalidation for the SRTO console
//!
//! Sits between the console UI and the backend API. Four cooperating
//! pieces:
//!
//! - [`cache::LruCache`]: generic LRU store with lazy TTL expiry, size
//!   estimation, statistics, and an optional durable mirror.
//! - [`geo::ViewportCache`]: map-viewport cache with 90% overlap acceptance.
//! - [`snapshot::SnapshotCache`]: compacted territory snapshots over the
//!   entry cache.
//! - [`query::QueryClient`]: tagged request/response cache with optimistic
//!   mutations, tag invalidation, and job-status polling.
//!
//! Caches are explicit instances built by the composition root and passed
//! to consumers; there are no global singletons.

pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod tasks;

pub use cache::{CacheStats, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use query::{Backend, Mutation, QueryClient, Signature, Tag};
pub use snapshot::SnapshotCache;
pub use tasks::spawn_sweep_task;
