//! Tests for the wire shapes produced by report formatting.

use std::path::PathBuf;

use varlens::document::{Document, DocumentSnapshot};
use varlens::host::{NoDeferredContainers, SnapshotVariableStore};
use varlens::report;
use varlens::scan::{CollectionError, ScanEngine, ScanError, ScanScope};

async fn scan_fixture() -> Vec<varlens::UsageEntry> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/document.json");
    let content = std::fs::read_to_string(path).unwrap();
    let mut snapshot: DocumentSnapshot = serde_json::from_str(&content).unwrap();
    let variables = std::mem::take(&mut snapshot.variables);
    let mut doc = Document::from_snapshot(snapshot);

    let mut engine = ScanEngine::new(SnapshotVariableStore::new(variables));
    engine
        .scan(&mut doc, ScanScope::Document, &NoDeferredContainers)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_json_report_wire_shape() {
    let entries = scan_fixture().await;
    let json = report::render_json(&entries).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 3);

    for entry in list {
        // exactly the documented keys, nothing internal
        let obj = entry.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["count", "layers", "name", "resolvedType"]);

        assert_eq!(
            entry["count"].as_u64().unwrap(),
            entry["layers"].as_array().unwrap().len() as u64
        );
        for layer in entry["layers"].as_array().unwrap() {
            assert!(layer["id"].is_string());
            assert!(layer["name"].is_string());
            assert!(layer["visible"].is_boolean());
        }
    }

    let first = &list[0];
    assert_eq!(first["name"], "colors/primary");
    assert_eq!(first["resolvedType"], "COLOR");
}

#[tokio::test]
async fn test_json_entries_parse_back() {
    let entries = scan_fixture().await;
    let json = report::render_json(&entries).unwrap();
    let parsed: Vec<varlens::UsageEntry> = serde_json::from_str(&json).unwrap();

    // variable ids never cross the wire
    assert!(parsed.iter().all(|e| e.variable_id.is_empty()));
    assert_eq!(parsed.len(), entries.len());
}

#[test]
fn test_failure_wire_shape_is_never_a_list() {
    let err = ScanError::Collection(CollectionError::Load {
        container: "page-2".to_string(),
        reason: "host went away".to_string(),
    });
    let json = report::render_json_failure(&err).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value.is_object());
    let error = value["error"].as_str().unwrap();
    assert!(error.contains("page-2"));
    assert!(error.contains("host went away"));
}
