//! Host-collaborator interfaces.
//!
//! The scanner runs against a host environment that owns the real document:
//! an editor process, a plugin sandbox, or - for the CLI and tests - a JSON
//! snapshot. These traits are the seam: the engine consumes them and never
//! assumes anything about the implementation behind them.

use std::collections::HashMap;

use crate::document::{ContainerIdx, NodeIdx, NodeSnapshot};
use crate::resolve::{ResolveError, VariableMetadata};
use crate::scan::CollectionError;

/// Per-id variable metadata lookup, independently failable.
#[allow(async_fn_in_trait)]
pub trait VariableStore {
    async fn variable_by_id(&self, id: &str) -> Result<Option<VariableMetadata>, ResolveError>;
}

/// On-demand loading of a deferred container's node trees.
#[allow(async_fn_in_trait)]
pub trait ContainerLoader {
    async fn load_container(&self, container_id: &str)
        -> Result<Vec<NodeSnapshot>, CollectionError>;
}

/// Host UI primitives consumed by layer navigation: node lookup, the active
/// container, selection, and viewport framing.
#[allow(async_fn_in_trait)]
pub trait Workbench {
    async fn node_by_id(&self, id: &str) -> Option<NodeIdx>;
    fn active_container(&self) -> ContainerIdx;
    async fn switch_container(&mut self, container: ContainerIdx);
    fn set_selection(&mut self, node: NodeIdx);
    fn frame_in_viewport(&mut self, node: NodeIdx);
}

/// Variable store backed by the definitions bundled in a document snapshot.
#[derive(Debug, Default)]
pub struct SnapshotVariableStore {
    variables: HashMap<String, VariableMetadata>,
}

impl SnapshotVariableStore {
    pub fn new(variables: Vec<VariableMetadata>) -> Self {
        Self {
            variables: variables.into_iter().map(|v| (v.id.clone(), v)).collect(),
        }
    }
}

impl VariableStore for SnapshotVariableStore {
    async fn variable_by_id(&self, id: &str) -> Result<Option<VariableMetadata>, ResolveError> {
        Ok(self.variables.get(id).cloned())
    }
}

/// Loader for documents whose containers are all present up front. Hitting a
/// deferred container through this loader is a collection failure.
#[derive(Debug, Default)]
pub struct NoDeferredContainers;

impl ContainerLoader for NoDeferredContainers {
    async fn load_container(
        &self,
        container_id: &str,
    ) -> Result<Vec<NodeSnapshot>, CollectionError> {
        Err(CollectionError::Load {
            container: container_id.to_string(),
            reason: "snapshot does not include this container's body".to_string(),
        })
    }
}
