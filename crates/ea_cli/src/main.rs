// crates/ea_cli/src/main.rs
//
// `ea` binary: parse flags → resolve session → pipeline → artifacts → optional reports.
// stdout carries the human summary only; status lines and tracing output go to stderr.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const RENDER: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};

use ea_core::{EnabledSet, MetricCatalog};
use ea_io::canonical_json;
use ea_pipeline::{load, run_with_ctx, EngineMeta, PipelineCtx, PipelineError, PipelineOutputs, MODEL_ID};
use ea_report::{build_model, format_value, summary_cards, IntegrityBlock, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Scenario shape, unknown keys, bad edits
    Validation(String),
    /// Read/write/path failures
    Io(String),
    /// Report build or renderer unavailable
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("ea: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(args.verbose);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("ea: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// fmt subscriber on stderr. `RUST_LOG` wins unless --verbose; default level is `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Render(_) => RENDER,
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validate(m) => MainError::Validation(m),
        PipelineError::Io(m) => MainError::Io(m),
        // Hash/canonicalization failures while building artifacts
        PipelineError::Build(m) => MainError::Io(format!("build: {m}")),
    }
}

/// Load + coerce + apply edits; no projection, no artifacts.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let scenario = load::resolve_session(args.scenario.as_deref(), &args.session_edits()).map_err(map_pipeline_err)?;
    debug!(preset = %scenario.preset, enabled = scenario.enabled.count(), "session resolved");
    if !args.quiet {
        eprintln!("validate-only: inputs OK");
    }
    Ok(())
}

fn engine_meta() -> EngineMeta {
    let base = ea_pipeline::engine_identifiers();
    EngineMeta {
        vendor: option_env!("EA_ENGINE_VENDOR").map_or(base.vendor, str::to_string),
        name: option_env!("EA_ENGINE_NAME").map_or(base.name, str::to_string),
        version: option_env!("EA_ENGINE_VERSION").map_or(base.version, str::to_string),
        build: option_env!("EA_ENGINE_BUILD").map_or(base.build, str::to_string),
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    // 1) Resolve the session (defaults ← scenario file ← flags)
    let scenario = load::resolve_session(args.scenario.as_deref(), &args.session_edits()).map_err(map_pipeline_err)?;

    // 2) Run pipeline
    let ctx = PipelineCtx::new(scenario, engine_meta()).map_err(map_pipeline_err)?;
    let outs = run_with_ctx(ctx).map_err(map_pipeline_err)?;

    // 3) Write canonical artifacts
    write_artifacts(&args.out, &outs)?;

    // 4) Report model (read-only over the projection artifact)
    let enabled = EnabledSet::only(&outs.projection.enabled).map_err(|e| MainError::Render(e.to_string()))?;
    let model = report_model(args, &outs, &enabled);
    maybe_render_reports(args, &model, &args.out)?;

    if !args.quiet {
        print_summary(&outs, &enabled);
        eprintln!("run: artifacts written to {}", args.out.to_string_lossy());
    }
    info!(projection_id = %outs.projection.id, out = %args.out.display(), "run complete");
    Ok(())
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.to_string_lossy())))?;

    canonical_json::write_canonical_file(&out_dir.join("projection.json"), &outs.projection)
        .map_err(|e| MainError::Io(format!("write projection.json: {e}")))?;

    canonical_json::write_canonical_file(&out_dir.join("run_record.json"), &outs.run_record)
        .map_err(|e| MainError::Io(format!("write run_record.json: {e}")))?;

    Ok(())
}

fn report_model(args: &Args, outs: &PipelineOutputs, enabled: &EnabledSet) -> ReportModel {
    let rec = &outs.run_record;
    let integrity = IntegrityBlock {
        projection_id: outs.projection.id.clone(),
        model_id: MODEL_ID.to_string(),
        preset: rec.preset.to_string(),
        scenario_sha256: rec.scenario_sha256.clone(),
        engine: format!("{} {} {} ({})", rec.engine.vendor, rec.engine.name, rec.engine.version, rec.engine.build),
    };
    build_model(outs.result(), enabled, &MetricCatalog::standard(), args.view, args.graph, integrity)
}

fn maybe_render_reports(args: &Args, model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(model, out_dir)?,
            "html" => render_html_report(model, out_dir)?,
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

// Always accept the concrete model type; gate body by feature.
#[allow(unused_variables)]
fn render_json_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let text = ea_report::render_json(model).map_err(|e| MainError::Render(e.to_string()))?;
        canonical_json::write_atomic(&out_dir.join("report.json"), text.as_bytes())
            .map_err(|e| MainError::Io(format!("write report.json: {e}")))
    }
    #[cfg(not(feature = "report-json"))]
    {
        Err(MainError::Render("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

#[allow(unused_variables)]
fn render_html_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        let html = ea_report::render_html(model);
        canonical_json::write_atomic(&out_dir.join("report.html"), html.as_bytes())
            .map_err(|e| MainError::Io(format!("write report.html: {e}")))
    }
    #[cfg(not(feature = "report-html"))]
    {
        Err(MainError::Render("html renderer not enabled (build with feature `report-html`)".into()))
    }
}

/// Summary cards plus the investment block, one line each.
fn print_summary(outs: &PipelineOutputs, enabled: &EnabledSet) {
    use ea_core::UnitKind::{Currency, Number};

    let r = outs.result();
    println!("EA impact projection {}", outs.projection.id);
    for c in summary_cards(r, enabled) {
        println!("  {:<20} {}", c.label, c.display);
    }
    println!("  {:<20} {}", "Annual Benefit", format_value(Some(r.total_annual_benefit), Currency));
    if enabled.ea_cost {
        println!("  {:<20} {}", "Investment", format_value(Some(r.investment_cost), Currency));
        println!("  {:<20} {} months", "Payback", format_value(Some(r.payback_months), Number));
    }
}
