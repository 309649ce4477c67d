//! Tagged Query Cache Store
//!
//! Stores server responses keyed by request signature, maintains the
//! tag-to-signatures index, and removes entries in bulk when a mutation
//! invalidates their tags. Removal is outright: downstream reads refetch
//! rather than being served stale-but-flagged data.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::current_timestamp_ms;
use crate::query::signature::Signature;
use crate::query::tag::Tag;

// == Endpoint TTLs ==
/// Per-endpoint entry lifetimes.
///
/// Matches the console's access profile: outlets churn, territories barely
/// move, analytics are expensive, job-status endpoints go stale in seconds.
#[derive(Debug, Clone)]
pub struct EndpointTtls {
    pub outlets: Duration,
    pub routes: Duration,
    pub territories: Duration,
    pub analytics: Duration,
    pub import_sessions: Duration,
    pub optimization: Duration,
    /// Fallback for endpoints outside the known families
    pub default: Duration,
}

impl Default for EndpointTtls {
    fn default() -> Self {
        Self {
            outlets: Duration::from_secs(300),
            routes: Duration::from_secs(600),
            territories: Duration::from_secs(1800),
            analytics: Duration::from_secs(3600),
            import_sessions: Duration::from_secs(60),
            optimization: Duration::from_secs(60),
            default: Duration::from_secs(300),
        }
    }
}

impl EndpointTtls {
    /// Resolves the TTL for an endpoint path.
    ///
    /// Job-status families are matched before their parent family so
    /// `routes/optimize/status/T1` gets the optimization TTL, not the
    /// routes TTL.
    pub fn ttl_for(&self, endpoint: &str) -> Duration {
        if endpoint.starts_with("routes/optimize") {
            return self.optimization;
        }
        if endpoint.starts_with("outlets/import") {
            return self.import_sessions;
        }
        match endpoint.split('/').next().unwrap_or("") {
            "outlets" => self.outlets,
            "routes" => self.routes,
            "territories" => self.territories,
            "analytics" => self.analytics,
            _ => self.default,
        }
    }
}

// == Query Entry ==
/// A cached response with its invalidation tags.
#[derive(Debug, Clone)]
pub struct QueryEntry {
    pub data: Value,
    pub tags: HashSet<Tag>,
    pub inserted_at: u64,
    pub ttl_millis: u64,
}

impl QueryEntry {
    fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.inserted_at) >= self.ttl_millis
    }
}

// == Query Cache ==
/// Signature-keyed response cache with a tag index.
///
/// The tag index (tag -> signature keys) is only ever mutated by
/// `insert`/`invalidate`/removal, keeping it exactly consistent with the
/// entry map.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, QueryEntry>,
    tag_index: HashMap<Tag, HashSet<String>>,
    ttls: EndpointTtls,
}

impl QueryCache {
    /// Creates a cache with the default TTL profile.
    pub fn new() -> Self {
        Self::with_ttls(EndpointTtls::default())
    }

    /// Creates a cache with a custom TTL profile.
    pub fn with_ttls(ttls: EndpointTtls) -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            ttls,
        }
    }

    // == Get ==
    /// Returns the live cached response for a signature, if any.
    ///
    /// Expired entries are removed (tag index included) and read as absent.
    pub fn get(&mut self, signature: &Signature) -> Option<Value> {
        let key = signature.key();
        let expired = self.entries.get(&key).map(QueryEntry::is_expired)?;
        if expired {
            self.remove_key(&key);
            return None;
        }
        self.entries.get(&key).map(|entry| entry.data.clone())
    }

    /// Immutable peek at the stored payload, without expiry side effects.
    /// Used by the optimistic layer to snapshot state before patching.
    pub fn peek(&self, signature: &Signature) -> Option<&Value> {
        self.entries.get(&signature.key()).map(|entry| &entry.data)
    }

    // == Insert ==
    /// Stores a response under its signature, tagged for invalidation.
    ///
    /// Overwrites any previous entry for the signature, re-pointing the tag
    /// index at the new tag set.
    pub fn insert(&mut self, signature: &Signature, data: Value, tags: Vec<Tag>) {
        let key = signature.key();
        self.remove_key(&key);

        let tags: HashSet<Tag> = tags.into_iter().collect();
        for tag in &tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        let ttl = self.ttls.ttl_for(signature.endpoint());
        self.entries.insert(
            key,
            QueryEntry {
                data,
                tags,
                inserted_at: current_timestamp_ms(),
                ttl_millis: ttl.as_millis() as u64,
            },
        );
    }

    // == Patch ==
    /// Applies an in-place edit to a cached payload; returns whether an
    /// entry existed. Tags and timestamps are untouched.
    pub fn patch(&mut self, signature: &Signature, edit: impl FnOnce(&mut Value)) -> bool {
        match self.entries.get_mut(&signature.key()) {
            Some(entry) => {
                edit(&mut entry.data);
                true
            }
            None => false,
        }
    }

    // == Invalidate ==
    /// Removes every entry carrying any of the given tags; returns the
    /// number of entries removed.
    pub fn invalidate(&mut self, tags: &[Tag]) -> usize {
        let mut doomed: HashSet<String> = HashSet::new();
        for tag in tags {
            if let Some(keys) = self.tag_index.get(tag) {
                doomed.extend(keys.iter().cloned());
            }
        }
        for key in &doomed {
            self.remove_key(key);
        }
        if !doomed.is_empty() {
            debug!(count = doomed.len(), "invalidated cache entries by tag");
        }
        doomed.len()
    }

    /// Removes a single signature's entry; returns whether one existed.
    pub fn remove(&mut self, signature: &Signature) -> bool {
        self.remove_key(&signature.key())
    }

    /// Empties the cache and the tag index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tag_index.clear();
    }

    /// Current number of cached responses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signatures currently covered by a tag (diagnostics).
    pub fn signatures_for(&self, tag: &Tag) -> usize {
        self.tag_index.get(tag).map_or(0, HashSet::len)
    }

    fn remove_key(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        true
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tag::EntityKind;
    use serde_json::json;

    fn list_sig() -> Signature {
        Signature::new("outlets").with_arg("page", 1)
    }

    fn entity_sig(id: &str) -> Signature {
        Signature::new(format!("outlets/{id}"))
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = QueryCache::new();
        cache.insert(
            &list_sig(),
            json!({"data": [{"id": "1"}]}),
            vec![Tag::list(EntityKind::Outlet), Tag::entity(EntityKind::Outlet, "1")],
        );

        assert_eq!(
            cache.get(&list_sig()),
            Some(json!({"data": [{"id": "1"}]}))
        );
    }

    #[test]
    fn test_entity_tag_invalidation_spares_list_only_entries() {
        let mut cache = QueryCache::new();
        cache.insert(
            &entity_sig("1"),
            json!({"id": "1"}),
            vec![Tag::entity(EntityKind::Outlet, "1")],
        );
        cache.insert(
            &list_sig(),
            json!({"data": []}),
            vec![Tag::list(EntityKind::Outlet)],
        );

        let removed = cache.invalidate(&[Tag::entity(EntityKind::Outlet, "1")]);

        assert_eq!(removed, 1);
        assert!(cache.get(&entity_sig("1")).is_none());
        assert!(cache.get(&list_sig()).is_some());
    }

    #[test]
    fn test_list_tag_invalidation_spares_entity_entries() {
        let mut cache = QueryCache::new();
        cache.insert(
            &entity_sig("1"),
            json!({"id": "1"}),
            vec![Tag::entity(EntityKind::Outlet, "1")],
        );
        cache.insert(
            &list_sig(),
            json!({"data": []}),
            vec![Tag::list(EntityKind::Outlet)],
        );

        let removed = cache.invalidate(&[Tag::list(EntityKind::Outlet)]);

        assert_eq!(removed, 1);
        assert!(cache.get(&entity_sig("1")).is_some());
        assert!(cache.get(&list_sig()).is_none());
    }

    #[test]
    fn test_one_tag_covers_many_entries() {
        let mut cache = QueryCache::new();
        let page1 = Signature::new("outlets").with_arg("page", 1);
        let page2 = Signature::new("outlets").with_arg("page", 2);
        cache.insert(&page1, json!({"page": 1}), vec![Tag::list(EntityKind::Outlet)]);
        cache.insert(&page2, json!({"page": 2}), vec![Tag::list(EntityKind::Outlet)]);

        assert_eq!(cache.signatures_for(&Tag::list(EntityKind::Outlet)), 2);
        assert_eq!(cache.invalidate(&[Tag::list(EntityKind::Outlet)]), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_scoped_list_tags_invalidate_independently() {
        let mut cache = QueryCache::new();
        let by_territory = Signature::new("outlets/territory/T1");
        cache.insert(
            &by_territory,
            json!({"data": []}),
            vec![Tag::scoped_list(EntityKind::Outlet, "T1")],
        );
        cache.insert(
            &list_sig(),
            json!({"data": []}),
            vec![Tag::list(EntityKind::Outlet)],
        );

        cache.invalidate(&[Tag::scoped_list(EntityKind::Outlet, "T1")]);

        assert!(cache.get(&by_territory).is_none());
        assert!(cache.get(&list_sig()).is_some());
    }

    #[test]
    fn test_overwrite_repoints_tag_index() {
        let mut cache = QueryCache::new();
        cache.insert(
            &list_sig(),
            json!({"v": 1}),
            vec![Tag::entity(EntityKind::Outlet, "old")],
        );
        cache.insert(
            &list_sig(),
            json!({"v": 2}),
            vec![Tag::entity(EntityKind::Outlet, "new")],
        );

        // The stale tag no longer reaches the entry
        assert_eq!(cache.invalidate(&[Tag::entity(EntityKind::Outlet, "old")]), 0);
        assert_eq!(cache.get(&list_sig()), Some(json!({"v": 2})));
    }

    #[test]
    fn test_patch_edits_in_place() {
        let mut cache = QueryCache::new();
        cache.insert(&list_sig(), json!({"total": 1}), vec![Tag::list(EntityKind::Outlet)]);

        let patched = cache.patch(&list_sig(), |data| {
            data["total"] = json!(2);
        });

        assert!(patched);
        assert_eq!(cache.get(&list_sig()), Some(json!({"total": 2})));
    }

    #[test]
    fn test_patch_missing_entry_reports_false() {
        let mut cache = QueryCache::new();
        assert!(!cache.patch(&list_sig(), |_| {}));
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let mut ttls = EndpointTtls::default();
        ttls.outlets = Duration::from_millis(0);
        let mut cache = QueryCache::with_ttls(ttls);

        cache.insert(&list_sig(), json!({}), vec![Tag::list(EntityKind::Outlet)]);

        assert!(cache.get(&list_sig()).is_none());
        assert!(cache.is_empty(), "expired entry removed on read");
        assert_eq!(cache.signatures_for(&Tag::list(EntityKind::Outlet)), 0);
    }

    #[test]
    fn test_ttl_resolution_by_endpoint_family() {
        let ttls = EndpointTtls::default();
        assert_eq!(ttls.ttl_for("outlets"), Duration::from_secs(300));
        assert_eq!(ttls.ttl_for("routes/R1"), Duration::from_secs(600));
        assert_eq!(ttls.ttl_for("territories"), Duration::from_secs(1800));
        assert_eq!(
            ttls.ttl_for("routes/optimize/status/T1"),
            Duration::from_secs(60)
        );
        assert_eq!(ttls.ttl_for("outlets/import/s1"), Duration::from_secs(60));
        assert_eq!(ttls.ttl_for("reports"), Duration::from_secs(300));
    }
}
