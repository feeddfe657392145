// crates/ea_pipeline/src/build_run_record.rs
//
// RunRecord: provenance for one projection.
// - scenario_sha256  = SHA-256 of the resolved scenario (after edits).
// - projection_sha256 = SHA-256 of canonical projection.json bytes (id included).
// - No wall-clock timestamp: identical sessions produce identical records.

use serde::{Deserialize, Serialize};

use ea_core::Preset;
use ea_io::{canonical_json, hasher};

use crate::{EngineMeta, PipelineCtx, PipelineError, ProjectionDoc, MODEL_ID};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub model_id: String,
    pub engine: EngineMeta,
    pub preset: Preset,
    pub scenario_sha256: String,
    pub outputs: RunOutputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutputs {
    pub projection_id: String,
    pub projection_sha256: String,
}

pub fn build_run_record(ctx: &PipelineCtx, projection: &ProjectionDoc) -> Result<RunRecordDoc, PipelineError> {
    let bytes = canonical_json::to_canonical_bytes(projection)?;
    Ok(RunRecordDoc {
        model_id: MODEL_ID.to_string(),
        engine: ctx.engine_meta.clone(),
        preset: ctx.scenario.preset,
        scenario_sha256: ctx.scenario_sha256.clone(),
        outputs: RunOutputs {
            projection_id: projection.id.clone(),
            projection_sha256: hasher::sha256_hex(&bytes),
        },
    })
}
