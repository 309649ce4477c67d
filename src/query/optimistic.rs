//! Optimistic Mutation Patches
//!
//! A patch speculatively edits cached entries the instant a mutation is
//! dispatched, recording a snapshot of every touched payload. Settlement
//! consumes the patch: commit discards the snapshots, rollback restores
//! them exactly.
//!
//! Rollback restores whatever snapshot was taken at apply time. When two
//! patches overlap on the same entries and the earlier one rolls back while
//! the later is still pending, the earlier snapshot wins; the later
//! mutation's settlement invalidates the affected tags anyway, so the next
//! read refetches authoritative state instead of trying to compose undos.

use serde_json::Value;
use tracing::warn;

use crate::cache::current_timestamp_ms;
use crate::query::signature::Signature;
use crate::query::store::QueryCache;

// == Patch State ==
/// Lifecycle of an optimistic patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    /// Built but not yet applied to the cache
    Idle,
    /// Speculative edits are live in the cache
    Applied,
    /// Mutation succeeded; snapshots discarded
    Committed,
    /// Mutation failed; snapshots restored
    RolledBack,
}

// == Optimistic Update ==
/// The speculative edits for one mutation: per-signature closures that
/// patch a cached payload in place (splice a temp entity into a list, merge
/// changed fields into an entity, and so on).
pub struct OptimisticUpdate {
    edits: Vec<(Signature, Box<dyn FnOnce(&mut Value) + Send>)>,
}

impl OptimisticUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    /// Adds an edit for one cached signature.
    pub fn edit(
        mut self,
        signature: Signature,
        apply: impl FnOnce(&mut Value) + Send + 'static,
    ) -> Self {
        self.edits.push((signature, Box::new(apply)));
        self
    }

    /// Number of edits declared.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// True if no edits were declared.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl Default for OptimisticUpdate {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OptimisticUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimisticUpdate")
            .field("edits", &self.edits.len())
            .finish()
    }
}

// == Optimistic Patch ==
/// One in-flight mutation's speculative state.
///
/// Exactly one patch exists per dispatched mutation; it is consumed at
/// settlement through `commit` or `rollback`.
#[derive(Debug)]
pub struct OptimisticPatch {
    /// Pre-patch payload snapshots of every touched entry
    saved: Vec<(Signature, Value)>,
    state: PatchState,
    /// Unix millis of the transition to `Applied`
    applied_at: Option<u64>,
}

impl OptimisticPatch {
    /// Applies the update to the cache and records undo snapshots.
    ///
    /// Signatures with no cached entry are skipped: there is nothing to
    /// patch and nothing to restore.
    pub fn apply(cache: &mut QueryCache, update: OptimisticUpdate) -> Self {
        let mut saved = Vec::new();
        for (signature, edit) in update.edits {
            let Some(before) = cache.peek(&signature).cloned() else {
                continue;
            };
            saved.push((signature.clone(), before));
            cache.patch(&signature, edit);
        }
        Self {
            saved,
            state: PatchState::Applied,
            applied_at: Some(current_timestamp_ms()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PatchState {
        self.state
    }

    /// Number of entries this patch touched.
    pub fn touched(&self) -> usize {
        self.saved.len()
    }

    /// When the patch went live, if it has.
    pub fn applied_at(&self) -> Option<u64> {
        self.applied_at
    }

    // == Commit ==
    /// Mutation succeeded: keep the speculative edits and drop the undo
    /// snapshots. The follow-up tag invalidation reconciles any drift.
    pub fn commit(&mut self) {
        if self.state != PatchState::Applied {
            warn!(state = ?self.state, "commit on a settled patch ignored");
            return;
        }
        self.saved.clear();
        self.state = PatchState::Committed;
    }

    // == Rollback ==
    /// Mutation failed: restore every touched payload to its pre-patch
    /// snapshot.
    pub fn rollback(&mut self, cache: &mut QueryCache) {
        if self.state != PatchState::Applied {
            warn!(state = ?self.state, "rollback on a settled patch ignored");
            return;
        }
        for (signature, before) in self.saved.drain(..) {
            // An entry invalidated since apply stays gone; restoring it
            // would resurrect data the cache already gave up on.
            cache.patch(&signature, move |data| *data = before);
        }
        self.state = PatchState::RolledBack;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tag::{EntityKind, Tag};
    use serde_json::json;

    fn seeded_cache() -> (QueryCache, Signature) {
        let mut cache = QueryCache::new();
        let sig = Signature::new("outlets").with_arg("page", 1);
        cache.insert(
            &sig,
            json!({"data": [{"id": "1", "name": "Old Name"}], "total": 1}),
            vec![Tag::list(EntityKind::Outlet)],
        );
        (cache, sig)
    }

    #[test]
    fn test_apply_edits_cache_and_snapshots() {
        let (mut cache, sig) = seeded_cache();

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            data["data"][0]["name"] = json!("New Name");
        });
        let patch = OptimisticPatch::apply(&mut cache, update);

        assert_eq!(patch.state(), PatchState::Applied);
        assert_eq!(patch.touched(), 1);
        assert_eq!(cache.peek(&sig).unwrap()["data"][0]["name"], "New Name");
    }

    #[test]
    fn test_rollback_restores_exact_state() {
        let (mut cache, sig) = seeded_cache();
        let before = cache.peek(&sig).cloned().unwrap();

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            data["data"][0]["name"] = json!("Speculative");
            data["total"] = json!(99);
        });
        let mut patch = OptimisticPatch::apply(&mut cache, update);
        patch.rollback(&mut cache);

        assert_eq!(patch.state(), PatchState::RolledBack);
        assert_eq!(cache.peek(&sig).cloned().unwrap(), before);
    }

    #[test]
    fn test_commit_keeps_speculative_state() {
        let (mut cache, sig) = seeded_cache();

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            data["total"] = json!(2);
        });
        let mut patch = OptimisticPatch::apply(&mut cache, update);
        patch.commit();

        assert_eq!(patch.state(), PatchState::Committed);
        assert_eq!(cache.peek(&sig).unwrap()["total"], 2);
    }

    #[test]
    fn test_uncached_signature_is_skipped() {
        let mut cache = QueryCache::new();
        let sig = Signature::new("outlets/999");

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            *data = json!({"id": "999"});
        });
        let patch = OptimisticPatch::apply(&mut cache, update);

        assert_eq!(patch.touched(), 0);
        assert!(cache.peek(&sig).is_none());
    }

    #[test]
    fn test_settled_patch_ignores_second_settlement() {
        let (mut cache, sig) = seeded_cache();

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            data["total"] = json!(5);
        });
        let mut patch = OptimisticPatch::apply(&mut cache, update);
        patch.commit();
        patch.rollback(&mut cache);

        // Commit won; rollback after settlement is a no-op
        assert_eq!(patch.state(), PatchState::Committed);
        assert_eq!(cache.peek(&sig).unwrap()["total"], 5);
    }

    #[test]
    fn test_rollback_skips_invalidated_entries() {
        let (mut cache, sig) = seeded_cache();

        let update = OptimisticUpdate::new().edit(sig.clone(), |data| {
            data["total"] = json!(7);
        });
        let mut patch = OptimisticPatch::apply(&mut cache, update);

        cache.invalidate(&[Tag::list(EntityKind::Outlet)]);
        patch.rollback(&mut cache);

        assert!(cache.peek(&sig).is_none(), "invalidated entry stays gone");
    }
}
