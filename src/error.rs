//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.
//!
//! The split matters more than the variants: cache-internal faults
//! (serialization for size estimation, persistence mirrors) are logged and
//! swallowed by the caches themselves, while upstream fetch/mutate failures
//! are always propagated to the caller untouched.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be serialized (size estimation or persistence)
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable key-value backend rejected a store/remove
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Backend API call failed; carries the upstream message verbatim
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// A signature or tag string could not be interpreted
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
