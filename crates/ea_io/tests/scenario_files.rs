use std::fs;

use assert_json_diff::assert_json_include;
use ea_io::canonical_json::write_canonical_file;
use ea_io::scenario::load_scenario;
use ea_io::IoError;
use serde_json::json;

#[test]
fn load_from_disk_and_echo_resolved_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.json");
    fs::write(
        &path,
        r#"{
            "preset": "standard",
            "inputs": { "pipeline": "2000000", "dealSize": 50000, "winRate": 10, "eaCost": "" },
            "enabled": ["pipeline", "dealSize", "winRate", "eaCost"]
        }"#,
    )
    .unwrap();

    let s = load_scenario(&path).unwrap();
    let echoed = serde_json::to_value(&s).unwrap();
    assert_json_include!(
        actual: echoed,
        expected: json!({
            "preset": "standard",
            "inputs": { "pipeline": 2000000.0, "dealSize": 50000.0, "winRate": 10.0, "eaCost": 0.0 },
            "enabled": { "pipeline": true, "dealSize": true, "winRate": true, "eaCost": true, "churn": false }
        })
    );
}

#[test]
fn resolved_scenario_round_trips_through_canonical_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("in.json");
    fs::write(&first, r#"{"inputs":{"nps":"45"},"enabled":{"nps":true}}"#).unwrap();
    let s = load_scenario(&first).unwrap();

    let second = dir.path().join("out/resolved.json");
    write_canonical_file(&second, &s).unwrap();
    let again = load_scenario(&second).unwrap();
    assert_eq!(s, again);
    assert_eq!(s.digest().unwrap(), again.digest().unwrap());
}

#[test]
fn missing_file_is_a_path_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_scenario(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, IoError::Path(_)));
}

#[test]
fn malformed_json_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_scenario(&path), Err(IoError::Json { .. })));
}
