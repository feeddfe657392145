//! Field-by-field session edits layered over a loaded scenario.
//!
//! Order: preset → `key=value` assignments → enables → disables. A preset
//! edit replaces the uplift table only; couplings and clamps are kept.

use tracing::debug;

use ea_core::{MetricKey, Preset};
use ea_io::scenario::Scenario;

use crate::PipelineError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionEdits {
    pub preset: Option<Preset>,
    /// `key=value` strings; values coerce like form text.
    pub set: Vec<String>,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
}

impl SessionEdits {
    pub fn is_empty(&self) -> bool {
        self.preset.is_none() && self.set.is_empty() && self.enable.is_empty() && self.disable.is_empty()
    }
}

pub fn apply_edits(scenario: &mut Scenario, edits: &SessionEdits) -> Result<(), PipelineError> {
    if let Some(p) = edits.preset {
        debug!(preset = %p, "preset override");
        scenario.preset = p;
        scenario.model.uplifts = p.uplifts();
    }
    for a in &edits.set {
        let key = scenario.inputs.apply_assignment(a)?;
        debug!(%key, value = scenario.inputs.get(key).unwrap_or(0.0), "input edited");
    }
    for k in &edits.enable {
        let key = MetricKey::parse_input(k)?;
        scenario.enabled.set(key, true)?;
        debug!(%key, "metric enabled");
    }
    for k in &edits.disable {
        let key = MetricKey::parse_input(k)?;
        scenario.enabled.set(key, false)?;
        debug!(%key, "metric disabled");
    }
    Ok(())
}
