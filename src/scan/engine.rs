//! Scan orchestration.
//!
//! One scan request runs the phases in order: collect bound nodes, extract
//! aliases chunk by chunk, resolve metadata, aggregate. Execution is
//! single-threaded and cooperative; the only fan-out is the batched metadata
//! fetch inside resolution. There is no cancellation: once collection starts,
//! the request runs to `Done` or `Failed`, and a finished request must be
//! reissued in full to run again.

use indexmap::IndexMap;
use thiserror::Error;

use crate::document::{Document, NodeIdx};
use crate::host::{ContainerLoader, VariableStore};
use crate::report::UsageEntry;
use crate::resolve::{VariableCache, VariableResolver, DEFAULT_FETCH_BATCH_SIZE};

use super::aggregate::aggregate_usage;
use super::collect::{collect_bound_nodes, CollectionError, ScanScope};
use super::extract::extract_aliases;

/// How many collected nodes are processed between suspension points during
/// alias extraction.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub chunk_size: usize,
    pub fetch_batch_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            fetch_batch_size: DEFAULT_FETCH_BATCH_SIZE,
        }
    }
}

/// Where the engine's latest request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Collecting,
    Resolving,
    Aggregating,
    Done,
    Failed,
}

/// Top-level scan failure.
///
/// Only collection can fail a scan; metadata-fetch failures degrade the
/// report by omission instead.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan aborted: {0}")]
    Collection(#[from] CollectionError),
}

/// The scanning engine. Owns the metadata cache via its resolver, so the
/// cache persists across scans for the engine's lifetime.
///
/// `scan` takes `&mut self`: overlapping requests against one engine are
/// rejected by the borrow checker rather than at runtime.
pub struct ScanEngine<S> {
    resolver: VariableResolver<S>,
    config: ScanConfig,
    phase: ScanPhase,
}

impl<S: VariableStore> ScanEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ScanConfig::default())
    }

    pub fn with_config(store: S, config: ScanConfig) -> Self {
        Self {
            resolver: VariableResolver::new(store).with_batch_size(config.fetch_batch_size),
            config,
            phase: ScanPhase::Idle,
        }
    }

    /// Phase of the most recent request; `Done` and `Failed` are terminal.
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn cache(&self) -> &VariableCache {
        self.resolver.cache()
    }

    /// Access the underlying metadata store.
    pub fn store(&self) -> &S {
        self.resolver.store()
    }

    /// Drop all cached metadata. The next scan refetches everything.
    pub fn reset_cache(&mut self) {
        self.resolver.reset_cache();
    }

    /// Run one scan request over the given scope.
    ///
    /// On success, returns usage entries in first-discovery order of variable
    /// ids. On collection failure, returns the error alone - entries from
    /// containers scanned before the failure are discarded.
    pub async fn scan<L: ContainerLoader>(
        &mut self,
        doc: &mut Document,
        scope: ScanScope,
        loader: &L,
    ) -> Result<Vec<UsageEntry>, ScanError> {
        self.phase = ScanPhase::Collecting;
        let nodes = match collect_bound_nodes(doc, scope, loader).await {
            Ok(nodes) => nodes,
            Err(e) => {
                self.phase = ScanPhase::Failed;
                return Err(e.into());
            }
        };
        tracing::debug!(nodes = nodes.len(), "collected bound nodes");

        let usage = self.extract_usage(doc, &nodes).await;

        self.phase = ScanPhase::Resolving;
        let unique_ids: Vec<String> = usage.keys().cloned().collect();
        let metadata = self.resolver.resolve(&unique_ids).await;

        self.phase = ScanPhase::Aggregating;
        let entries = aggregate_usage(doc, &usage, &metadata);
        tracing::debug!(
            variables = unique_ids.len(),
            reported = entries.len(),
            "scan complete"
        );

        self.phase = ScanPhase::Done;
        Ok(entries)
    }

    /// Map each referenced variable id to its referencing nodes, one node
    /// entry per binding site, yielding between fixed-size node chunks.
    async fn extract_usage(
        &self,
        doc: &Document,
        nodes: &[NodeIdx],
    ) -> IndexMap<String, Vec<NodeIdx>> {
        let chunk_size = self.config.chunk_size.max(1);
        let mut usage: IndexMap<String, Vec<NodeIdx>> = IndexMap::new();
        for (i, &node_idx) in nodes.iter().enumerate() {
            if i > 0 && i % chunk_size == 0 {
                tokio::task::yield_now().await;
            }
            let Some(bindings) = doc.node(node_idx).bindings.as_ref() else {
                continue;
            };
            for id in extract_aliases(bindings) {
                usage.entry(id).or_default().push(node_idx);
            }
        }
        usage
    }
}
