//! Effective visibility of a node through its ancestor chain.

use crate::document::{Document, NodeIdx};

/// A node is effectively visible only if it and every node ancestor up to the
/// container root are visible. Containers and the document root carry no
/// visibility flag, so a chain that reaches them without a hidden node is
/// visible. Report annotation only; hidden nodes are still scanned.
pub fn effective_visibility(doc: &Document, node: NodeIdx) -> bool {
    doc.node(node).visible && doc.ancestors(node).all(|a| doc.node(a).visible)
}
