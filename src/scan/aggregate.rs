//! Usage aggregation phase.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::document::{Document, Node, NodeIdx};
use crate::report::{LayerRef, UsageEntry};
use crate::resolve::VariableMetadata;

use super::visibility::effective_visibility;

/// Placeholder shown for layers whose own name is empty.
pub const UNNAMED_LAYER: &str = "(unnamed)";

/// Build one [`UsageEntry`] per variable that resolved.
///
/// `usage` maps variable id to the nodes referencing it, both in
/// first-discovery order; that order carries through to the report. A node
/// referencing the same variable from several binding sites appears in
/// `usage` once per site but collapses to a single layer here, and `count`
/// only moves when a layer is added. Ids without metadata produce no entry.
pub fn aggregate_usage(
    doc: &Document,
    usage: &IndexMap<String, Vec<NodeIdx>>,
    metadata: &IndexMap<String, VariableMetadata>,
) -> Vec<UsageEntry> {
    let mut entries = Vec::with_capacity(metadata.len());
    for (variable_id, nodes) in usage {
        let Some(meta) = metadata.get(variable_id) else {
            continue;
        };

        let mut entry = UsageEntry {
            variable_id: variable_id.clone(),
            name: meta.name.clone(),
            resolved_type: Some(meta.resolved_type),
            count: 0,
            layers: Vec::new(),
        };

        let mut seen: HashSet<NodeIdx> = HashSet::new();
        for &node_idx in nodes {
            if !seen.insert(node_idx) {
                continue;
            }
            let node = doc.node(node_idx);
            entry.layers.push(LayerRef {
                name: display_name(node),
                id: node.id.clone(),
                visible: effective_visibility(doc, node_idx),
            });
            entry.count += 1;
        }

        entries.push(entry);
    }
    entries
}

fn display_name(node: &Node) -> String {
    if node.name.is_empty() {
        UNNAMED_LAYER.to_string()
    } else {
        node.name.clone()
    }
}
