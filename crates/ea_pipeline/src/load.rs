//! LOAD stage: scenario file (or defaults) → edits → resolved session.

use std::path::Path;

use tracing::{debug, info_span};

use ea_io::scenario::{load_scenario, Scenario};

use crate::edit::{apply_edits, SessionEdits};
use crate::PipelineError;

/// Load `path` when given, otherwise start from defaults; then apply edits.
pub fn resolve_session(path: Option<&Path>, edits: &SessionEdits) -> Result<Scenario, PipelineError> {
    let _s = info_span!("load").entered();
    let mut scenario = match path {
        Some(p) => {
            debug!(path = %p.display(), "loading scenario");
            load_scenario(p)?
        }
        None => {
            debug!("no scenario file; using defaults");
            Scenario::default()
        }
    };
    apply_edits(&mut scenario, edits)?;
    Ok(scenario)
}
