//! Node collection phase.
//!
//! Walks the requested scope and returns every node carrying a binding
//! structure, hidden nodes included. Whole-document scans process containers
//! one at a time, loading deferred containers first and yielding to the
//! scheduler between containers so a long collection never monopolizes the
//! host. Any failure aborts the whole collection; a partial node list is
//! never returned.

use thiserror::Error;

use crate::document::{ContainerIdx, Document, NodeIdx};
use crate::host::ContainerLoader;

/// What a scan request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    /// Only the currently active container.
    ActiveContainer,
    /// Every container in the document, loading deferred ones as needed.
    Document,
}

/// Traversal or container-load failure. Always fatal to the scan.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("container \"{container}\" could not be loaded: {reason}")]
    Load { container: String, reason: String },
    #[error("container \"{container}\" not found in document")]
    UnknownContainer { container: String },
}

/// Collect every node in scope that carries at least one binding structure.
pub async fn collect_bound_nodes<L: ContainerLoader>(
    doc: &mut Document,
    scope: ScanScope,
    loader: &L,
) -> Result<Vec<NodeIdx>, CollectionError> {
    match scope {
        ScanScope::ActiveContainer => {
            if doc.containers().next().is_none() {
                return Ok(Vec::new());
            }
            let container = doc.active_container();
            ensure_loaded(doc, container, loader).await?;
            Ok(bound_nodes_in(doc, container))
        }
        ScanScope::Document => {
            let containers: Vec<ContainerIdx> = doc.containers().map(|(idx, _)| idx).collect();
            let mut nodes = Vec::new();
            for container in containers {
                ensure_loaded(doc, container, loader).await?;
                nodes.extend(bound_nodes_in(doc, container));
                tokio::task::yield_now().await;
            }
            Ok(nodes)
        }
    }
}

async fn ensure_loaded<L: ContainerLoader>(
    doc: &mut Document,
    container: ContainerIdx,
    loader: &L,
) -> Result<(), CollectionError> {
    if doc.container(container).is_loaded() {
        return Ok(());
    }
    let id = doc.container(container).id.clone();
    tracing::debug!(container = %id, "loading deferred container");
    let roots = loader.load_container(&id).await?;
    doc.attach_container_body(container, roots);
    Ok(())
}

/// Depth-first walk of one loaded container, keeping nodes with bindings.
/// Visibility is not consulted here; hidden nodes are collected too.
fn bound_nodes_in(doc: &Document, container: ContainerIdx) -> Vec<NodeIdx> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeIdx> = doc.container(container).roots().iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        if doc.node(idx).bindings.is_some() {
            found.push(idx);
        }
        stack.extend(doc.node(idx).children().iter().rev());
    }
    found
}
