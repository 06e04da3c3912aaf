//! Variable metadata resolution.
//!
//! Turns the set of variable ids referenced by a scan into `{name, type}`
//! metadata. Cache hits are served immediately; misses are fetched from the
//! host's [`VariableStore`](crate::host::VariableStore) in fixed-size batches,
//! each batch issued concurrently and awaited as a unit. A fetch failure for
//! one id never aborts the batch: the failure is logged and that id simply
//! produces no metadata, which excludes it from the final report.

mod cache;

pub use cache::VariableCache;

use futures::future;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::VariableStore;

/// How many metadata fetches are issued concurrently per batch.
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 50;

/// Error from a single variable-metadata fetch.
///
/// Always isolated to its id: logged, never propagated out of resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("variable lookup failed: {0}")]
    Lookup(String),
}

/// The resolved type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Color => "COLOR",
            VariableType::Float => "FLOAT",
            VariableType::String => "STRING",
            VariableType::Boolean => "BOOLEAN",
        }
    }
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved metadata for one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMetadata {
    pub id: String,
    pub name: String,
    pub resolved_type: VariableType,
}

/// Batched metadata resolver with a session-scoped cache.
///
/// The cache outlives any single scan; a warm rescan of an unchanged document
/// performs zero fetches.
pub struct VariableResolver<S> {
    store: S,
    cache: VariableCache,
    batch_size: usize,
}

impl<S: VariableStore> VariableResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: VariableCache::new(),
            batch_size: DEFAULT_FETCH_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn cache(&self) -> &VariableCache {
        &self.cache
    }

    /// Access the underlying metadata store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }

    /// Resolve metadata for a set of unique ids.
    ///
    /// The returned map preserves the order of `ids` and contains an entry
    /// only for ids that resolved, now or in an earlier scan. Misses are
    /// fetched batch by batch, yielding to the scheduler between batches.
    pub async fn resolve(&mut self, ids: &[String]) -> IndexMap<String, VariableMetadata> {
        let misses: Vec<&String> = ids.iter().filter(|id| !self.cache.contains(id)).collect();
        tracing::debug!(
            total = ids.len(),
            misses = misses.len(),
            "resolving variable metadata"
        );

        for batch in misses.chunks(self.batch_size) {
            let fetches = batch.iter().map(|id| self.store.variable_by_id(id));
            let results = future::join_all(fetches).await;

            for (id, result) in batch.iter().zip(results) {
                match result {
                    Ok(Some(metadata)) => self.cache.insert(metadata),
                    Ok(None) => {
                        tracing::debug!(%id, "variable not found, omitting from report");
                    }
                    Err(e) => {
                        tracing::warn!(%id, error = %e, "variable fetch failed, omitting from report");
                    }
                }
            }

            tokio::task::yield_now().await;
        }

        ids.iter()
            .filter_map(|id| self.cache.get(id).map(|m| (id.clone(), m.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Store that counts fetches and fails on ids starting with "bad".
    struct TestStore {
        variables: HashMap<String, VariableMetadata>,
        fetches: Cell<usize>,
    }

    impl TestStore {
        fn with(ids: &[&str]) -> Self {
            let variables = ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        VariableMetadata {
                            id: id.to_string(),
                            name: format!("var/{id}"),
                            resolved_type: VariableType::Float,
                        },
                    )
                })
                .collect();
            Self {
                variables,
                fetches: Cell::new(0),
            }
        }
    }

    impl VariableStore for TestStore {
        async fn variable_by_id(&self, id: &str) -> Result<Option<VariableMetadata>, ResolveError> {
            self.fetches.set(self.fetches.get() + 1);
            if id.starts_with("bad") {
                return Err(ResolveError::Lookup(format!("no access to {id}")));
            }
            Ok(self.variables.get(id).cloned())
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_preserves_input_order() {
        let mut resolver = VariableResolver::new(TestStore::with(&["v2", "v1", "v3"]));
        let resolved = resolver.resolve(&ids(&["v3", "v1", "v2"])).await;
        let order: Vec<&str> = resolved.keys().map(String::as_str).collect();
        assert_eq!(order, ["v3", "v1", "v2"]);
    }

    #[tokio::test]
    async fn test_warm_cache_fetches_nothing() {
        let mut resolver = VariableResolver::new(TestStore::with(&["v1", "v2"]));
        let first = resolver.resolve(&ids(&["v1", "v2"])).await;
        assert_eq!(resolver.store.fetches.get(), 2);

        let second = resolver.resolve(&ids(&["v1", "v2"])).await;
        assert_eq!(resolver.store.fetches.get(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_isolated() {
        let mut resolver = VariableResolver::new(TestStore::with(&["v1"]));
        let resolved = resolver.resolve(&ids(&["bad-1", "v1", "missing"])).await;

        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains_key("v1"));
    }

    #[tokio::test]
    async fn test_failed_id_not_cached_and_refetched() {
        let mut resolver = VariableResolver::new(TestStore::with(&[]));
        resolver.resolve(&ids(&["bad-1"])).await;
        resolver.resolve(&ids(&["bad-1"])).await;
        // no negative caching: each scan retries the id once
        assert_eq!(resolver.store.fetches.get(), 2);
    }

    #[tokio::test]
    async fn test_reset_cache_forces_refetch() {
        let mut resolver = VariableResolver::new(TestStore::with(&["v1"]));
        resolver.resolve(&ids(&["v1"])).await;
        resolver.reset_cache();
        resolver.resolve(&ids(&["v1"])).await;
        assert_eq!(resolver.store.fetches.get(), 2);
    }

    #[tokio::test]
    async fn test_small_batches_cover_all_ids() {
        let all: Vec<String> = (0..7).map(|i| format!("v{i}")).collect();
        let raw: Vec<&str> = all.iter().map(String::as_str).collect();
        let mut resolver = VariableResolver::new(TestStore::with(&raw)).with_batch_size(3);

        let resolved = resolver.resolve(&all).await;
        assert_eq!(resolved.len(), 7);
    }
}
