//! Invalidation Tags
//!
//! Every cached query result carries one or more tags; mutations declare the
//! tags they invalidate. A result must share at least one tag with the
//! mutations that can affect it, or it will only ever leave the cache by TTL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Entity Kind ==
/// The entity families served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Outlet,
    Route,
    Territory,
    Optimization,
    ImportSession,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Outlet => "Outlet",
            EntityKind::Route => "Route",
            EntityKind::Territory => "Territory",
            EntityKind::Optimization => "Optimization",
            EntityKind::ImportSession => "ImportSession",
        };
        write!(f, "{name}")
    }
}

impl FromStr for EntityKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Outlet" => Ok(EntityKind::Outlet),
            "Route" => Ok(EntityKind::Route),
            "Territory" => Ok(EntityKind::Territory),
            "Optimization" => Ok(EntityKind::Optimization),
            "ImportSession" => Ok(EntityKind::ImportSession),
            other => Err(CacheError::InvalidSignature(format!(
                "unknown entity kind: {other}"
            ))),
        }
    }
}

// == Tag ==
/// An invalidation class label.
///
/// Two flavors: entity-id tags (`Outlet:42`) cover the queries that returned
/// that entity; collection tags (`Outlet:LIST`, `Outlet:LIST:T1` when scoped
/// to a parent) cover listing queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Covers queries returning a specific entity
    Entity { kind: EntityKind, id: String },
    /// Covers listing queries, optionally scoped to a parent id
    List {
        kind: EntityKind,
        scope: Option<String>,
    },
}

impl Tag {
    /// Entity-id tag (`Kind:id`).
    pub fn entity(kind: EntityKind, id: impl Into<String>) -> Self {
        Tag::Entity { kind, id: id.into() }
    }

    /// Unscoped collection tag (`Kind:LIST`).
    pub fn list(kind: EntityKind) -> Self {
        Tag::List { kind, scope: None }
    }

    /// Collection tag scoped to a parent (`Kind:LIST:parentId`).
    pub fn scoped_list(kind: EntityKind, scope: impl Into<String>) -> Self {
        Tag::List {
            kind,
            scope: Some(scope.into()),
        }
    }

    /// The entity kind this tag belongs to.
    pub fn kind(&self) -> EntityKind {
        match self {
            Tag::Entity { kind, .. } | Tag::List { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Entity { kind, id } => write!(f, "{kind}:{id}"),
            Tag::List { kind, scope: None } => write!(f, "{kind}:LIST"),
            Tag::List {
                kind,
                scope: Some(scope),
            } => write!(f, "{kind}:LIST:{scope}"),
        }
    }
}

impl FromStr for Tag {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let kind: EntityKind = parts
            .next()
            .ok_or_else(|| CacheError::InvalidSignature(format!("empty tag: {s}")))?
            .parse()?;
        let second = parts
            .next()
            .ok_or_else(|| CacheError::InvalidSignature(format!("tag missing id: {s}")))?;
        if second == "LIST" {
            Ok(Tag::List {
                kind,
                scope: parts.next().map(str::to_string),
            })
        } else {
            Ok(Tag::Entity {
                kind,
                id: second.to_string(),
            })
        }
    }
}
