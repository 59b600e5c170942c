use predicates::prelude::*;

mod common;
use common::{TestWorkspace, sample_index};

/// All records are listed in document order.
#[test]
fn test_list_all_records() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["list", index.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 record(s)"))
        .stdout(predicate::str::contains("medialibrary-pro"))
        .stdout(predicate::str::contains("theme-mirages"))
        .stdout(predicate::str::contains("updated 2026-08-01"));
}

/// The type filter narrows the listing.
#[test]
fn test_list_filter_by_type() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["list", index.to_str().unwrap(), "--type", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 record(s)"))
        .stdout(predicate::str::contains("theme-mirages"))
        .stdout(predicate::str::contains("medialibrary-pro").not());
}

/// JSON output is the serialized record list, camelCase fields included.
#[test]
fn test_list_json_format() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    let output = ws
        .workshop()
        .args(["list", index.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["id"], "medialibrary-pro");
    assert_eq!(records[0]["isGithub"], true);
    // Absent optional fields are omitted, not null.
    assert!(records[0].get("subdir").is_none());
    assert_eq!(records[1]["subdir"], "配套插件/BsCore");
}

/// A format error in the index fails the listing too; no partial output.
#[test]
fn test_list_rejects_malformed_index() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(r#"{"updatedAt": "2026-08-01"}"#);

    ws.workshop()
        .args(["list", index.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("projects"));
}
