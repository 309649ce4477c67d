//! Tagged Query Cache Module
//!
//! Request/response caching keyed by deterministic signatures, tag-based
//! invalidation on mutation, optimistic patches, and job-status polling.

mod client;
mod optimistic;
mod polling;
mod signature;
mod store;
mod tag;

// Re-export public types
pub use client::{Backend, FetchResponse, Mutation, MutationKind, QueryClient};
pub use optimistic::{OptimisticPatch, OptimisticUpdate, PatchState};
pub use polling::{spawn_poll_until, spawn_status_poll, DEFAULT_POLL_INTERVAL};
pub use signature::Signature;
pub use store::{EndpointTtls, QueryCache, QueryEntry};
pub use tag::{EntityKind, Tag};
