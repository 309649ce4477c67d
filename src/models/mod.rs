//! Domain models shared by the caching layer.
//!
//! These mirror the backend's entity schemas far enough for tagging,
//! compaction, and optimistic patching; the UI owns everything else.

pub mod outlet;
pub mod snapshot;
pub mod status;

// Re-export commonly used types
pub use outlet::{Channel, Location, Outlet, OutletSummary, Tier};
pub use snapshot::{CompactSnapshot, SnapshotMetrics, TerritorySnapshot};
pub use status::JobStatus;
