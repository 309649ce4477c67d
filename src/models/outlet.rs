//! Outlet domain types.
//!
//! Mirrors the backend's outlet schema closely enough for caching and
//! optimistic patching; the console's forms own validation.

use serde::{Deserialize, Serialize};

/// A geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Sales channel classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Supermarket,
    Convenience,
    Horeca,
    Traditional,
}

/// Commercial tier classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

/// A sales outlet as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlet {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub channel: Channel,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nppd_score: Option<f64>,
    /// Visit duration in minutes
    pub service_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_territory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_route: Option<String>,
}

/// Reduced outlet projection kept in compacted snapshots. Everything beyond
/// identity, location, and classification is dropped to bound memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletSummary {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub tier: Tier,
    pub channel: Channel,
}

impl From<&Outlet> for OutletSummary {
    fn from(outlet: &Outlet) -> Self {
        Self {
            id: outlet.id.clone(),
            name: outlet.name.clone(),
            location: outlet.location,
            tier: outlet.tier,
            channel: outlet.channel,
        }
    }
}
