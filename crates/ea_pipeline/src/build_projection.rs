//! BUILD_PROJECTION: wrap the engine result into the canonical `projection.json`
//! document. The id is `PRJ:` + SHA-256 of the canonical payload without the id.

use serde::{Deserialize, Serialize};

use ea_core::{InputSet, MetricKey, Preset, ProjectionResult};
use ea_io::{hasher, scenario::Scenario};

use crate::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDoc {
    pub id: String,
    pub preset: Preset,
    /// Enabled input keys at projection time, in form order.
    pub enabled: Vec<MetricKey>,
    pub inputs: InputSet,
    pub result: ProjectionResult,
}

#[derive(Serialize)]
struct ProjectionNoId<'a> {
    preset: Preset,
    enabled: &'a [MetricKey],
    inputs: &'a InputSet,
    result: &'a ProjectionResult,
}

pub fn build_projection(scenario: &Scenario, result: ProjectionResult) -> Result<ProjectionDoc, PipelineError> {
    let enabled: Vec<MetricKey> = scenario.enabled.keys().collect();
    let payload = ProjectionNoId {
        preset: scenario.preset,
        enabled: &enabled,
        inputs: &scenario.inputs,
        result: &result,
    };
    let id = hasher::prj_id_from_canonical(&payload)?;
    Ok(ProjectionDoc {
        id,
        preset: scenario.preset,
        enabled,
        inputs: scenario.inputs.clone(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ea_core::ImpactModel;

    fn run(s: &Scenario) -> ProjectionDoc {
        let r = ea_algo::project(&s.inputs, &s.enabled, &s.model);
        build_projection(s, r).unwrap()
    }

    #[test]
    fn id_is_stable_and_content_addressed() {
        let s = Scenario::default();
        let a = run(&s);
        let b = run(&s);
        assert_eq!(a.id, b.id);
        assert!(hasher::is_artifact_id(&a.id, "PRJ"));

        let mut s2 = Scenario::default();
        s2.model = ImpactModel::from_preset(Preset::Conservative);
        assert_ne!(run(&s2).id, a.id);
    }

    #[test]
    fn enabled_list_follows_form_order() {
        let doc = run(&Scenario::default());
        assert_eq!(
            doc.enabled,
            vec![MetricKey::Pipeline, MetricKey::DealSize, MetricKey::WinRate]
        );
    }
}
