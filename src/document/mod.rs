//! In-memory snapshot of a design document.
//!
//! A document is a set of top-level containers (pages), each owning a tree of
//! nodes. Nodes live in one arena per document; parent/child links are arena
//! indices, and the scanner only ever borrows nodes from here. Container
//! bodies may be deferred: the node trees of an unloaded container are fetched
//! through a [`ContainerLoader`](crate::host::ContainerLoader) before that
//! container is scanned.

mod binding;

pub use binding::{AliasKind, AliasRef, BindingMap, BindingValue, ScalarValue};

use std::collections::HashMap;

use serde::Deserialize;

use crate::resolve::VariableMetadata;

/// Arena index of a node within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

/// Index of a top-level container within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerIdx(usize);

/// A visual node. Owned by the document arena, never by the scanner.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Display name; may be empty.
    pub name: String,
    pub visible: bool,
    pub parent: Option<NodeIdx>,
    pub bindings: Option<BindingMap>,
    children: Vec<NodeIdx>,
    container: ContainerIdx,
}

impl Node {
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }
}

/// A top-level container (page).
#[derive(Debug, Clone)]
pub struct Container {
    pub id: String,
    pub name: String,
    body: ContainerBody,
}

#[derive(Debug, Clone)]
enum ContainerBody {
    Loaded(Vec<NodeIdx>),
    Deferred,
}

impl Container {
    /// Whether this container's node trees are present in the arena.
    pub fn is_loaded(&self) -> bool {
        matches!(self.body, ContainerBody::Loaded(_))
    }

    /// Top-level nodes, empty for a deferred container.
    pub fn roots(&self) -> &[NodeIdx] {
        match &self.body {
            ContainerBody::Loaded(roots) => roots,
            ContainerBody::Deferred => &[],
        }
    }
}

/// A point-in-time snapshot of one document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    containers: Vec<Container>,
    arena: Vec<Node>,
    by_id: HashMap<String, NodeIdx>,
    active: usize,
}

impl Document {
    /// Build a document from a deserialized snapshot. Deferred containers keep
    /// an empty body until [`Document::attach_container_body`] fills them in.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        let mut doc = Document::default();
        for container in snapshot.containers {
            let idx = ContainerIdx(doc.containers.len());
            doc.containers.push(Container {
                id: container.id,
                name: container.name,
                body: if container.deferred {
                    ContainerBody::Deferred
                } else {
                    ContainerBody::Loaded(Vec::new())
                },
            });
            if !container.deferred {
                doc.attach_container_body(idx, container.children);
            }
            if snapshot.active_container.as_deref() == Some(doc.containers[idx.0].id.as_str()) {
                doc.active = idx.0;
            }
        }
        doc
    }

    /// Insert a container's node trees into the arena and mark it loaded.
    pub fn attach_container_body(&mut self, container: ContainerIdx, roots: Vec<NodeSnapshot>) {
        let mut root_indices = Vec::with_capacity(roots.len());
        for root in roots {
            root_indices.push(self.insert_tree(root, None, container));
        }
        self.containers[container.0].body = ContainerBody::Loaded(root_indices);
    }

    fn insert_tree(
        &mut self,
        snapshot: NodeSnapshot,
        parent: Option<NodeIdx>,
        container: ContainerIdx,
    ) -> NodeIdx {
        let idx = NodeIdx(self.arena.len());
        self.arena.push(Node {
            id: snapshot.id,
            name: snapshot.name,
            visible: snapshot.visible,
            parent,
            bindings: snapshot.bindings,
            children: Vec::with_capacity(snapshot.children.len()),
            container,
        });
        self.by_id.insert(self.arena[idx.0].id.clone(), idx);
        for child in snapshot.children {
            let child_idx = self.insert_tree(child, Some(idx), container);
            self.arena[idx.0].children.push(child_idx);
        }
        idx
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.arena[idx.0]
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIdx> {
        self.by_id.get(id).copied()
    }

    pub fn containers(&self) -> impl Iterator<Item = (ContainerIdx, &Container)> {
        self.containers
            .iter()
            .enumerate()
            .map(|(i, c)| (ContainerIdx(i), c))
    }

    pub fn container(&self, idx: ContainerIdx) -> &Container {
        &self.containers[idx.0]
    }

    pub fn container_by_id(&self, id: &str) -> Option<ContainerIdx> {
        self.containers
            .iter()
            .position(|c| c.id == id)
            .map(ContainerIdx)
    }

    /// The currently active container (the "current page").
    pub fn active_container(&self) -> ContainerIdx {
        ContainerIdx(self.active)
    }

    pub fn set_active_container(&mut self, idx: ContainerIdx) {
        self.active = idx.0;
    }

    /// The top-level container a node belongs to.
    pub fn owning_container(&self, node: NodeIdx) -> ContainerIdx {
        self.arena[node.0].container
    }

    /// Walk from a node's parent up to (excluding) the container root.
    pub fn ancestors(&self, node: NodeIdx) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.arena[node.0].parent,
        }
    }
}

/// Iterator over a node's ancestor chain, nearest first.
pub struct Ancestors<'d> {
    doc: &'d Document,
    next: Option<NodeIdx>,
}

impl<'d> Iterator for Ancestors<'d> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}

// =============================================================================
// Snapshot wire format
// =============================================================================

/// Serialized form of a whole document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub name: String,
    pub containers: Vec<ContainerSnapshot>,
    /// Variable definitions bundled with the snapshot, if any. Consumed by
    /// [`SnapshotVariableStore`](crate::host::SnapshotVariableStore).
    #[serde(default)]
    pub variables: Vec<VariableMetadata>,
    #[serde(default)]
    pub active_container: Option<String>,
}

/// Serialized form of one container.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// When true the container body is absent and must be fetched on demand.
    #[serde(default)]
    pub deferred: bool,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

/// Serialized form of one node subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub bindings: Option<BindingMap>,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

fn default_visible() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json(json: &str) -> Document {
        let snapshot: DocumentSnapshot = serde_json::from_str(json).unwrap();
        Document::from_snapshot(snapshot)
    }

    #[test]
    fn test_snapshot_roundtrip_structure() {
        let doc = snapshot_json(
            r#"{
                "containers": [{
                    "id": "page-1",
                    "name": "Page 1",
                    "children": [
                        {"id": "frame-1", "name": "Frame", "children": [
                            {"id": "rect-1", "name": "Rect", "visible": false}
                        ]}
                    ]
                }]
            }"#,
        );

        let frame = doc.node_by_id("frame-1").unwrap();
        let rect = doc.node_by_id("rect-1").unwrap();
        assert_eq!(doc.node(frame).children(), &[rect]);
        assert_eq!(doc.node(rect).parent, Some(frame));
        assert!(!doc.node(rect).visible);
        assert_eq!(doc.owning_container(rect), doc.active_container());
    }

    #[test]
    fn test_deferred_container_has_no_roots() {
        let doc = snapshot_json(
            r#"{"containers": [{"id": "page-1", "name": "Lazy", "deferred": true}]}"#,
        );
        let (idx, container) = doc.containers().next().unwrap();
        assert!(!container.is_loaded());
        assert!(container.roots().is_empty());
        assert_eq!(idx, ContainerIdx(0));
    }

    #[test]
    fn test_attach_deferred_body() {
        let mut doc = snapshot_json(
            r#"{"containers": [{"id": "page-1", "name": "Lazy", "deferred": true}]}"#,
        );
        let idx = doc.container_by_id("page-1").unwrap();
        doc.attach_container_body(
            idx,
            vec![NodeSnapshot {
                id: "n1".into(),
                name: "Node".into(),
                visible: true,
                bindings: None,
                children: Vec::new(),
            }],
        );
        assert!(doc.container(idx).is_loaded());
        assert!(doc.node_by_id("n1").is_some());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let doc = snapshot_json(
            r#"{
                "containers": [{
                    "id": "p", "name": "P",
                    "children": [{"id": "a", "children": [{"id": "b", "children": [{"id": "c"}]}]}]
                }]
            }"#,
        );
        let c = doc.node_by_id("c").unwrap();
        let chain: Vec<&str> = doc
            .ancestors(c)
            .map(|idx| doc.node(idx).id.as_str())
            .collect();
        assert_eq!(chain, ["b", "a"]);
    }
}
