//! Layer navigation.
//!
//! Jumps the host UI to a layer by id: switch to the owning container if it
//! is not the active one, select exactly that node, and frame it in the
//! viewport. An id that resolves to no node is ignored without surfacing an
//! error; callers that need to distinguish a miss must check the document
//! themselves first.

use crate::document::Document;
use crate::host::Workbench;

/// Focus the host UI on one layer. Effects only, no return value.
pub async fn focus_layer<W: Workbench>(doc: &Document, workbench: &mut W, layer_id: &str) {
    let Some(node) = workbench.node_by_id(layer_id).await else {
        tracing::debug!(%layer_id, "focus target not found, ignoring");
        return;
    };

    let owner = doc.owning_container(node);
    if owner != workbench.active_container() {
        workbench.switch_container(owner).await;
    }

    workbench.set_selection(node);
    workbench.frame_in_viewport(node);
}
