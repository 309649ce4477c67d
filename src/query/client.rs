//! Query Client
//!
//! Read-through access to the tagged query cache over an injected backend,
//! plus the mutation path: optimistic patch, network write, settlement, and
//! tag invalidation. Invalidation always runs before a mutation's future
//! resolves, so a read issued after `mutate` returns observes
//! post-invalidation state.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::query::optimistic::{OptimisticPatch, OptimisticUpdate};
use crate::query::signature::Signature;
use crate::query::store::QueryCache;
use crate::query::tag::{EntityKind, Tag};

// == Backend Trait ==
/// The boundary to the backend API.
///
/// `fetch` carries HTTP GET semantics, `mutate` POST/PUT/DELETE; payloads
/// are arbitrary JSON. Implementations must not cache; that is this layer's
/// job.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Performs the read for a signature, returning the payload and the
    /// tags the response provides.
    async fn fetch(&self, signature: &Signature) -> Result<FetchResponse>;

    /// Performs a write; the payload shape is endpoint-specific.
    async fn mutate(&self, signature: &Signature, payload: Value) -> Result<Value>;
}

/// A fetched payload with its invalidation tags.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub data: Value,
    pub tags: Vec<Tag>,
}

impl FetchResponse {
    /// Builds the conventional tag set for a listing response: one entity
    /// tag per returned id plus the (optionally scoped) collection tag.
    pub fn listing(
        data: Value,
        kind: EntityKind,
        ids: impl IntoIterator<Item = String>,
        scope: Option<String>,
    ) -> Self {
        let mut tags: Vec<Tag> = ids.into_iter().map(|id| Tag::entity(kind, id)).collect();
        tags.push(match scope {
            Some(scope) => Tag::scoped_list(kind, scope),
            None => Tag::list(kind),
        });
        Self { data, tags }
    }
}

// == Mutation ==
/// What kind of write a mutation performs; drives the invalidation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Bulk,
}

/// A declared write: target signature, payload, and the tags it settles by
/// invalidating.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub signature: Signature,
    pub payload: Value,
    pub kind: MutationKind,
    pub invalidates: Vec<Tag>,
}

impl Mutation {
    /// A create invalidates the collection tag only; the new entity has no
    /// prior cache entry.
    pub fn create(kind: EntityKind, signature: Signature, payload: Value) -> Self {
        Self {
            signature,
            payload,
            kind: MutationKind::Create,
            invalidates: vec![Tag::list(kind)],
        }
    }

    /// An update invalidates the entity tag and the collection tag.
    pub fn update(kind: EntityKind, id: &str, signature: Signature, payload: Value) -> Self {
        Self {
            signature,
            payload,
            kind: MutationKind::Update,
            invalidates: vec![Tag::entity(kind, id), Tag::list(kind)],
        }
    }

    /// A delete invalidates the entity tag and collection tag; chain
    /// [`Mutation::also_invalidates`] for relationship tags such as the
    /// territory-scoped listings the entity belonged to.
    pub fn delete(kind: EntityKind, id: &str, signature: Signature) -> Self {
        Self {
            signature,
            payload: Value::Null,
            kind: MutationKind::Delete,
            invalidates: vec![Tag::entity(kind, id), Tag::list(kind)],
        }
    }

    /// A bulk write invalidates the collection tag.
    pub fn bulk(kind: EntityKind, signature: Signature, payload: Value) -> Self {
        Self {
            signature,
            payload,
            kind: MutationKind::Bulk,
            invalidates: vec![Tag::list(kind)],
        }
    }

    /// Adds a tag to the invalidation set.
    pub fn also_invalidates(mut self, tag: Tag) -> Self {
        self.invalidates.push(tag);
        self
    }
}

// == Query Client ==
/// Read-through, write-through access to the tagged query cache.
///
/// Construct one per composition root and hand it to consumers; tests build
/// a fresh client per case. There are no module-level cache singletons.
pub struct QueryClient<B> {
    backend: B,
    cache: Arc<RwLock<QueryCache>>,
}

impl<B: Backend> QueryClient<B> {
    /// Creates a client with a fresh cache.
    pub fn new(backend: B) -> Self {
        Self::with_cache(backend, QueryCache::new())
    }

    /// Creates a client over a pre-configured cache (custom TTL profile).
    pub fn with_cache(backend: B, cache: QueryCache) -> Self {
        Self {
            backend,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Shared handle to the underlying cache.
    pub fn cache(&self) -> Arc<RwLock<QueryCache>> {
        self.cache.clone()
    }

    /// The injected backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // == Read ==
    /// Serves a signature from the cache, fetching from the backend on miss.
    ///
    /// A fetch failure stores nothing; the next read retries. Concurrent
    /// reads of the same signature during an in-flight fetch each go to the
    /// backend; request dedup belongs to the request layer above.
    pub async fn read(&self, signature: &Signature) -> Result<Value> {
        {
            let mut cache = self.cache.write().await;
            if let Some(data) = cache.get(signature) {
                debug!(signature = %signature, "served from query cache");
                return Ok(data);
            }
        }

        let response = self.backend.fetch(signature).await?;
        let mut cache = self.cache.write().await;
        cache.insert(signature, response.data.clone(), response.tags);
        debug!(signature = %signature, "fetched and cached");
        Ok(response.data)
    }

    // == Refetch ==
    /// Fetches a signature from the backend unconditionally, replacing any
    /// cached entry. Used by polling loops.
    pub async fn refetch(&self, signature: &Signature) -> Result<Value> {
        let response = self.backend.fetch(signature).await?;
        let mut cache = self.cache.write().await;
        cache.insert(signature, response.data.clone(), response.tags);
        Ok(response.data)
    }

    // == Mutate ==
    /// Dispatches a write and, on success, invalidates the mutation's tag
    /// set before resolving. Failures propagate untouched.
    pub async fn mutate(&self, mutation: Mutation) -> Result<Value> {
        let data = self
            .backend
            .mutate(&mutation.signature, mutation.payload.clone())
            .await?;

        let removed = {
            let mut cache = self.cache.write().await;
            cache.invalidate(&mutation.invalidates)
        };
        info!(
            signature = %mutation.signature,
            kind = ?mutation.kind,
            invalidated = removed,
            "mutation settled"
        );
        Ok(data)
    }

    // == Mutate Optimistic ==
    /// Dispatches a write with a speculative cache patch applied first.
    ///
    /// On success the patch is committed and the tag set invalidated (the
    /// forced refetch reconciles any drift between the speculative shape and
    /// the server's authoritative one). On failure the patch is rolled back
    /// before the error is surfaced, restoring the pre-dispatch cache state
    /// exactly.
    pub async fn mutate_optimistic(
        &self,
        mutation: Mutation,
        update: OptimisticUpdate,
    ) -> Result<Value> {
        let mut patch = {
            let mut cache = self.cache.write().await;
            OptimisticPatch::apply(&mut cache, update)
        };
        debug!(
            signature = %mutation.signature,
            touched = patch.touched(),
            "optimistic patch applied"
        );

        match self
            .backend
            .mutate(&mutation.signature, mutation.payload.clone())
            .await
        {
            Ok(data) => {
                let mut cache = self.cache.write().await;
                patch.commit();
                let removed = cache.invalidate(&mutation.invalidates);
                info!(
                    signature = %mutation.signature,
                    invalidated = removed,
                    "optimistic mutation committed"
                );
                Ok(data)
            }
            Err(err) => {
                let mut cache = self.cache.write().await;
                patch.rollback(&mut cache);
                info!(signature = %mutation.signature, "optimistic mutation rolled back");
                Err(err)
            }
        }
    }
}

impl<B> std::fmt::Debug for QueryClient<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient").finish_non_exhaustive()
    }
}
