//! ea_pipeline: deterministic pipeline surface (load → edit → project → build).
//! File I/O, canonical JSON and hashing stay in `ea_io`; arithmetic stays in `ea_algo`.
//! Each stage runs inside a `tracing` span; this crate never installs a subscriber.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use ea_core::ProjectionResult;
use ea_io::scenario::Scenario;

pub mod build_projection;
pub mod build_run_record;
pub mod edit;
pub mod load;

pub use build_projection::ProjectionDoc;
pub use build_run_record::RunRecordDoc;
pub use edit::SessionEdits;

/// Model identifier echoed in every run record.
pub const MODEL_ID: &str = "EA-IMPACT v0";

/// Engine identifiers (baked by the build system in real deployments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Pipeline context: a fully resolved scenario plus its digest.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub scenario: Scenario,
    pub scenario_sha256: String,
    pub engine_meta: EngineMeta,
}

impl PipelineCtx {
    pub fn new(scenario: Scenario, engine_meta: EngineMeta) -> Result<Self, PipelineError> {
        let scenario_sha256 = scenario.digest()?;
        Ok(Self { scenario, scenario_sha256, engine_meta })
    }
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub projection: ProjectionDoc,
    pub run_record: RunRecordDoc,
}

impl PipelineOutputs {
    pub fn result(&self) -> &ProjectionResult {
        &self.projection.result
    }
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Validate(String),
    Build(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Build(m) => write!(f, "build: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ea_io::IoError> for PipelineError {
    fn from(e: ea_io::IoError) -> Self {
        use ea_io::IoError::*;
        match e {
            Path(m) => PipelineError::Io(format!("path: {m}")),
            Json { pointer, msg } => PipelineError::Validate(format!("json {pointer}: {msg}")),
            Invalid(m) => PipelineError::Validate(m),
            Hash(m) => PipelineError::Build(format!("hash: {m}")),
        }
    }
}

impl From<ea_core::CoreError> for PipelineError {
    fn from(e: ea_core::CoreError) -> Self {
        PipelineError::Validate(e.to_string())
    }
}

// -------------------------------------- Public API --------------------------------------

/// Project a resolved scenario and build both artifacts.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    let span = info_span!("pipeline", preset = %ctx.scenario.preset, enabled = ctx.scenario.enabled.count());
    let _guard = span.enter();

    let result = {
        let _s = info_span!("project").entered();
        let s = &ctx.scenario;
        ea_algo::project(&s.inputs, &s.enabled, &s.model)
    };
    debug!(
        benefit = result.total_annual_benefit,
        roi = result.roi,
        payback_months = result.payback_months,
        "projection computed"
    );

    let projection = {
        let _s = info_span!("build_projection").entered();
        build_projection::build_projection(&ctx.scenario, result)?
    };

    let run_record = {
        let _s = info_span!("build_run_record").entered();
        build_run_record::build_run_record(&ctx, &projection)?
    };

    info!(projection_id = %projection.id, "pipeline complete");
    Ok(PipelineOutputs { projection, run_record })
}

/// Load a scenario file, apply edits, and run.
pub fn run_from_scenario_path<P: AsRef<Path>>(
    path: Option<P>,
    edits: &SessionEdits,
) -> Result<PipelineOutputs, PipelineError> {
    let path: Option<&Path> = path.as_ref().map(|p| p.as_ref());
    let scenario = load::resolve_session(path, edits)?;
    let ctx = PipelineCtx::new(scenario, engine_identifiers())?;
    run_with_ctx(ctx)
}

/// Engine identifiers for use in the run record.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "ea".to_string(),
        name: "ea_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "dev".to_string(),
    }
}
