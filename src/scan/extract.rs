//! Alias extraction from binding structures.

use crate::document::{BindingMap, BindingValue};

/// Collect every alias id in a node's binding structure, at any depth, in
/// structure order. One entry per binding site; duplicates preserved, so a
/// node binding the same variable on two properties yields the id twice.
pub fn extract_aliases(bindings: &BindingMap) -> Vec<String> {
    let mut ids = Vec::new();
    for value in bindings.values() {
        collect_aliases(value, &mut ids);
    }
    ids
}

fn collect_aliases(value: &BindingValue, out: &mut Vec<String>) {
    match value {
        BindingValue::Alias(alias) => out.push(alias.id.clone()),
        BindingValue::Scalar(_) => {}
        BindingValue::List(items) => {
            for item in items {
                collect_aliases(item, out);
            }
        }
        BindingValue::Map(map) => {
            for nested in map.values() {
                collect_aliases(nested, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(json: &str) -> BindingMap {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_structure() {
        assert!(extract_aliases(&bindings("{}")).is_empty());
    }

    #[test]
    fn test_no_markers() {
        let map = bindings(r#"{"opacity": 0.5, "fills": [{"color": "red"}], "on": true}"#);
        assert!(extract_aliases(&map).is_empty());
    }

    #[test]
    fn test_duplicates_preserved_across_depths() {
        let map = bindings(
            r#"{
                "a": {"type": "VARIABLE_ALIAS", "id": "v1"},
                "b": [
                    {"type": "VARIABLE_ALIAS", "id": "v1"},
                    {"c": {"type": "VARIABLE_ALIAS", "id": "v2"}}
                ]
            }"#,
        );
        assert_eq!(extract_aliases(&map), ["v1", "v1", "v2"]);
    }

    #[test]
    fn test_deeply_nested_marker() {
        let map = bindings(
            r#"{"strokes": [[{"paint": {"stops": [{"color": {"type": "VARIABLE_ALIAS", "id": "v9"}}]}}]]}"#,
        );
        assert_eq!(extract_aliases(&map), ["v9"]);
    }
}
