use std::fs;
use std::path::PathBuf;

use assert_json_diff::assert_json_include;
use ea_core::MetricKey;
use ea_pipeline::{run_from_scenario_path, PipelineError, SessionEdits, MODEL_ID};
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn funnel_scenario_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("funnel.json");
    fs::write(
        &path,
        r#"{ "inputs": { "pipeline": 1000000, "dealSize": 100000, "winRate": 20, "eaCost": 200000 },
             "enabled": ["pipeline", "dealSize", "winRate"],
             "model": { "uplifts": { "winRate": 0.35, "dealSize": 0 } } }"#,
    )
    .unwrap();

    let outs = run_from_scenario_path(Some(&path), &SessionEdits::default()).unwrap();
    let r = outs.result();
    assert_eq!(r.current.get(MetricKey::Revenue), Some(200_000.0));
    assert!(close(r.projected.get(MetricKey::Revenue).unwrap(), 270_000.0));
    assert!(close(r.roi, -65.0));
    assert!(close(r.payback_months, 34.285_714_285_714_285));

    assert_eq!(outs.run_record.outputs.projection_id, outs.projection.id);
    assert_eq!(outs.run_record.model_id, MODEL_ID);
}

#[test]
fn investment_only_via_edits() {
    let edits = SessionEdits {
        enable: vec!["eaCost".into()],
        disable: vec!["pipeline".into(), "dealSize".into(), "winRate".into()],
        ..SessionEdits::default()
    };
    let outs = run_from_scenario_path(None::<PathBuf>, &edits).unwrap();
    assert_eq!(outs.result().roi, -100.0);
    assert_eq!(outs.result().payback_months, 0.0);

    let doc = serde_json::to_value(&outs.projection).unwrap();
    assert_json_include!(
        actual: doc,
        expected: json!({
            "enabled": ["eaCost"],
            "result": {
                "current": { "eaCost": 200000.0 },
                "improvement": { "eaCost": 0.0 },
                "roi": -100.0,
                "paybackMonths": 0.0
            }
        })
    );
}

#[test]
fn identical_sessions_produce_identical_records() {
    let a = run_from_scenario_path(None::<PathBuf>, &SessionEdits::default()).unwrap();
    let b = run_from_scenario_path(None::<PathBuf>, &SessionEdits::default()).unwrap();
    assert_eq!(a.run_record, b.run_record);

    let edits = SessionEdits { set: vec!["winRate=21".into()], ..SessionEdits::default() };
    let c = run_from_scenario_path(None::<PathBuf>, &edits).unwrap();
    assert_ne!(a.run_record.scenario_sha256, c.run_record.scenario_sha256);
    assert_ne!(a.projection.id, c.projection.id);
}

#[test]
fn bad_scenario_maps_to_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "inputs": { "revenue": 5 } }"#).unwrap();
    let err = run_from_scenario_path(Some(&path), &SessionEdits::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Validate(_)));
}
