//! Scenario files: one JSON object carrying the whole session state.
//!
//! ```json
//! { "preset": "standard",
//!   "inputs":  { "pipeline": 1000000, "winRate": "20" },
//!   "enabled": ["pipeline", "dealSize", "winRate"],
//!   "model":   { "uplifts": { "winRate": 0.35 } } }
//! ```
//!
//! Notes:
//! - Every field is optional; omitted fields keep their defaults.
//! - Input values coerce like form text: numbers and numeric strings pass,
//!   anything else (blank, words, bool, null, non-finite) becomes 0.
//! - `enabled` is either a map of flags (unlisted keys keep defaults) or a
//!   list of keys (exactly those are on).
//! - `model` is merged over the preset's model, so partial overrides work.
//! - Unknown or derived keys are rejected as `IoError::Invalid`.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use ea_core::inputs::{coerce_text, finite_or_zero};
use ea_core::{EnabledSet, ImpactModel, InputSet, MetricKey, Preset};

use crate::{hasher, IoError};

const TOP_LEVEL_FIELDS: [&str; 4] = ["preset", "inputs", "enabled", "model"];

/// Resolved session state.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub preset: Preset,
    pub inputs: InputSet,
    pub enabled: EnabledSet,
    pub model: ImpactModel,
}

impl Scenario {
    /// SHA-256 of the resolved scenario's canonical bytes.
    pub fn digest(&self) -> Result<String, IoError> {
        hasher::sha256_canonical(self)
    }
}

/// Coerce one JSON value to an input number.
pub fn coerce_value(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().map(finite_or_zero).unwrap_or(0.0),
        Value::String(s) => coerce_text(s),
        _ => 0.0,
    }
}

/// Read and resolve a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, IoError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_scenario_str(&text)
}

pub fn parse_scenario_str(text: &str) -> Result<Scenario, IoError> {
    let root: Value = serde_json::from_str(text)?;
    parse_scenario_value(&root)
}

pub fn parse_scenario_value(root: &Value) -> Result<Scenario, IoError> {
    let obj = root.as_object().ok_or_else(|| json_err("/", "scenario must be a JSON object"))?;
    if let Some(k) = obj.keys().find(|k| !TOP_LEVEL_FIELDS.contains(&k.as_str())) {
        return Err(IoError::Invalid(format!("unknown scenario field: {k}")));
    }

    let preset = match obj.get("preset") {
        None | Some(Value::Null) => Preset::default(),
        Some(Value::String(s)) => s.parse::<Preset>()?,
        Some(_) => return Err(json_err("/preset", "expected a string")),
    };

    let mut inputs = InputSet::default();
    if let Some(v) = obj.get("inputs") {
        apply_inputs(&mut inputs, v)?;
    }

    let enabled = match obj.get("enabled") {
        None | Some(Value::Null) => EnabledSet::default(),
        Some(v) => parse_enabled(v)?,
    };

    let model = resolve_model(preset, obj.get("model"))?;

    Ok(Scenario { preset, inputs, enabled, model })
}

fn apply_inputs(inputs: &mut InputSet, v: &Value) -> Result<(), IoError> {
    let map = v.as_object().ok_or_else(|| json_err("/inputs", "expected an object"))?;
    for (k, raw) in map {
        let key = input_key(k, "/inputs")?;
        inputs.set(key, coerce_value(raw))?;
    }
    Ok(())
}

fn parse_enabled(v: &Value) -> Result<EnabledSet, IoError> {
    match v {
        Value::Object(map) => {
            let mut en = EnabledSet::default();
            for (k, flag) in map {
                let key = input_key(k, "/enabled")?;
                let on = flag
                    .as_bool()
                    .ok_or_else(|| json_err(&format!("/enabled/{k}"), "expected a boolean"))?;
                en.set(key, on)?;
            }
            Ok(en)
        }
        Value::Array(items) => {
            let mut keys = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let k = item
                    .as_str()
                    .ok_or_else(|| json_err(&format!("/enabled/{i}"), "expected a metric key"))?;
                keys.push(input_key(k, "/enabled")?);
            }
            Ok(EnabledSet::only(&keys)?)
        }
        _ => Err(json_err("/enabled", "expected an object or an array")),
    }
}

fn resolve_model(preset: Preset, overrides: Option<&Value>) -> Result<ImpactModel, IoError> {
    let base = ImpactModel::from_preset(preset);
    let patch = match overrides {
        None | Some(Value::Null) => return Ok(base),
        Some(Value::Object(o)) => o,
        Some(_) => return Err(json_err("/model", "expected an object")),
    };
    let mut merged = serde_json::to_value(base)?;
    merge_objects(&mut merged, patch);
    serde_json::from_value(merged).map_err(|e| IoError::Invalid(format!("model: {e}")))
}

/// Recursive object merge; non-object values in `patch` replace.
fn merge_objects(target: &mut Value, patch: &Map<String, Value>) {
    let dst = match target {
        Value::Object(dst) => dst,
        other => {
            *other = Value::Object(patch.clone());
            return;
        }
    };
    for (k, pv) in patch {
        match pv {
            Value::Object(po) if dst.get(k).is_some_and(Value::is_object) => {
                if let Some(dv) = dst.get_mut(k) {
                    merge_objects(dv, po);
                }
            }
            _ => {
                dst.insert(k.clone(), pv.clone());
            }
        }
    }
}

fn input_key(k: &str, at: &str) -> Result<MetricKey, IoError> {
    MetricKey::parse_input(k).map_err(|e| IoError::Invalid(format!("{at}/{k}: {e}")))
}

fn json_err(pointer: &str, msg: &str) -> IoError {
    IoError::Json { pointer: pointer.to_string(), msg: msg.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_all_defaults() {
        let s = parse_scenario_str("{}").unwrap();
        assert_eq!(s, Scenario::default());
    }

    #[test]
    fn coercion_follows_form_rules() {
        assert_eq!(coerce_value(&json!(12.5)), 12.5);
        assert_eq!(coerce_value(&json!("40")), 40.0);
        assert_eq!(coerce_value(&json!("")), 0.0);
        assert_eq!(coerce_value(&json!("lots")), 0.0);
        assert_eq!(coerce_value(&json!(true)), 0.0);
        assert_eq!(coerce_value(&Value::Null), 0.0);
        assert_eq!(coerce_value(&json!([1])), 0.0);
    }

    #[test]
    fn inputs_override_defaults_and_accept_alias() {
        let s = parse_scenario_value(&json!({
            "inputs": { "winRate": "25", "teamSize": 8, "nps": "n/a" }
        }))
        .unwrap();
        assert_eq!(s.inputs.win_rate, 25.0);
        assert_eq!(s.inputs.sales_reps, 8.0);
        assert_eq!(s.inputs.nps, 0.0);
        assert_eq!(s.inputs.pipeline, 1_000_000.0);
    }

    #[test]
    fn derived_and_unknown_keys_are_invalid() {
        for doc in [
            json!({"inputs": {"revenue": 1}}),
            json!({"inputs": {"bogus": 1}}),
            json!({"enabled": ["roi"]}),
            json!({"enabled": {"grossProfit": true}}),
            json!({"extra": 1}),
            json!({"model": {"uplifts": {"pipeline": 0.1}}}),
        ] {
            assert!(
                matches!(parse_scenario_value(&doc), Err(IoError::Invalid(_))),
                "{doc}"
            );
        }
    }

    #[test]
    fn enabled_list_is_exact_map_is_patch() {
        let s = parse_scenario_value(&json!({"enabled": ["eaCost"]})).unwrap();
        assert_eq!(s.enabled, EnabledSet::only(&[MetricKey::EaCost]).unwrap());

        let s = parse_scenario_value(&json!({"enabled": {"churn": true, "pipeline": false}})).unwrap();
        assert!(s.enabled.churn && !s.enabled.pipeline && s.enabled.win_rate);
    }

    #[test]
    fn enabled_flags_must_be_bool() {
        let err = parse_scenario_value(&json!({"enabled": {"churn": "yes"}})).unwrap_err();
        match err {
            IoError::Json { pointer, .. } => assert_eq!(pointer, "/enabled/churn"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn model_overrides_merge_over_preset() {
        let s = parse_scenario_value(&json!({
            "preset": "conservative",
            "model": { "uplifts": { "dealSize": 0 }, "clamps": { "npsCap": 70 } }
        }))
        .unwrap();
        assert_eq!(s.preset, Preset::Conservative);
        assert_eq!(s.model.uplifts.win_rate, 0.20);
        assert_eq!(s.model.uplifts.deal_size, 0.0);
        assert_eq!(s.model.clamps.nps_cap, 70.0);
        assert_eq!(s.model.clamps.retention_cap, 95.0);
    }

    #[test]
    fn unknown_preset_is_invalid() {
        assert!(matches!(
            parse_scenario_value(&json!({"preset": "wild"})),
            Err(IoError::Invalid(_))
        ));
    }

    #[test]
    fn digest_tracks_content() {
        let a = Scenario::default();
        let mut b = Scenario::default();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        b.inputs.win_rate = 21.0;
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }
}
