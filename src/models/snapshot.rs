//! Territory snapshot types.
//!
//! A snapshot is a versioned capture of a territory's state (outlets plus
//! summary metrics). Full snapshots can be large; the snapshot cache stores
//! the compacted form only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::outlet::{Outlet, OutletSummary};

/// A full territory snapshot as produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritorySnapshot {
    pub territory_id: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub outlets: Vec<Outlet>,
    /// Route ids belonging to the territory at capture time
    pub route_ids: Vec<String>,
    pub metrics: SnapshotMetrics,
}

/// Aggregate metrics captured with a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetrics {
    pub total_outlets: usize,
    pub total_sales_volume: f64,
    /// Square kilometers
    pub coverage_area: f64,
}

/// The lossy, cache-sized form of a snapshot.
///
/// Outlets are reduced to their [`OutletSummary`] projection; this is a
/// reduced view and must never be written back to the backend as if it were
/// a full snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSnapshot {
    pub territory_id: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub outlets: Vec<OutletSummary>,
    pub route_ids: Vec<String>,
    pub metrics: SnapshotMetrics,
}

impl TerritorySnapshot {
    /// Compacts the snapshot by stripping outlet detail fields.
    pub fn compact(&self) -> CompactSnapshot {
        CompactSnapshot {
            territory_id: self.territory_id.clone(),
            version: self.version.clone(),
            created_at: self.created_at,
            outlets: self.outlets.iter().map(OutletSummary::from).collect(),
            route_ids: self.route_ids.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
