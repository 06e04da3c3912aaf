//! Binding structures attached to document nodes.
//!
//! A node's bindings map property names to values of arbitrary shape: scalars,
//! alias markers pointing at variables, lists, and nested mappings. The shape
//! is not fixed per property, so the type here is a small closed set of
//! variants and every consumer handles all of them by construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level binding structure of a node: property name to bound value.
pub type BindingMap = IndexMap<String, BindingValue>;

/// One value inside a binding structure.
///
/// Deserialization recognizes the alias-marker shape
/// `{ "type": "VARIABLE_ALIAS", "id": "..." }` before falling back to a plain
/// mapping, so downstream code never has to probe raw maps for marker keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    Alias(AliasRef),
    Scalar(ScalarValue),
    List(Vec<BindingValue>),
    Map(IndexMap<String, BindingValue>),
}

/// An alias marker referencing a variable by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRef {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
}

impl AliasRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: AliasKind::VariableAlias,
            id: id.into(),
        }
    }
}

/// Marker tag distinguishing alias maps from ordinary mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// A leaf value carrying no variable reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}
