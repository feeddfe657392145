// crates/ea_cli/src/args.rs
//
// CLI argument surface and validation.
// - No networked paths (reject any scheme:// like http/https/file)
// - Field edits: --set key=value, --enable key, --disable key (repeatable, applied in that order)
// - Presentation: --view summary|detailed|roi, --graph summary|multi|detailed
// - Output: --out dir, --render [json|html]*
// - --validate-only loads and coerces the session without projecting

use std::path::{Path, PathBuf};

use clap::Parser;

use ea_core::{MetricKey, Preset};
use ea_pipeline::SessionEdits;
use ea_report::{GraphType, ViewMode};

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ea",
    disable_help_subcommand = true,
    about = "Offline, deterministic EA impact projection"
)]
pub struct Args {
    /// Scenario JSON (inputs, enabled flags, model overrides). Defaults apply when omitted.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    // --- Field edits ---
    /// Edit one input, e.g. `winRate=25`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
    /// Enable an input metric. Repeatable.
    #[arg(long, value_name = "KEY")]
    pub enable: Vec<String>,
    /// Disable an input metric. Repeatable.
    #[arg(long, value_name = "KEY")]
    pub disable: Vec<String>,
    /// Uplift preset (replaces the scenario's uplift table).
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<Preset>,

    // --- Presentation ---
    #[arg(long, default_value = "summary", value_parser = parse_view)]
    pub view: ViewMode,
    #[arg(long, default_value = "summary", value_parser = parse_graph)]
    pub graph: GraphType,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Renderer(s) to emit. Choose up to 2 (json, html). Omit to skip rendering.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    // --- Control ---
    /// Load and coerce inputs only; do not project or write artifacts.
    #[arg(long)]
    pub validate_only: bool,
    /// Suppress the stdout summary and status lines.
    #[arg(long)]
    pub quiet: bool,
    /// Debug-level diagnostics on stderr (overrides RUST_LOG).
    #[arg(long)]
    pub verbose: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    BadEdit(String),
    DuplicateRender(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            BadEdit(m) => write!(f, "invalid edit: {m}"),
            DuplicateRender(r) => write!(f, "renderer requested twice: {r}"),
        }
    }
}
impl std::error::Error for CliError {}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse::<Preset>().map_err(|e| e.to_string())
}

fn parse_view(s: &str) -> Result<ViewMode, String> {
    s.parse::<ViewMode>().map_err(|e| e.to_string())
}

fn parse_graph(s: &str) -> Result<GraphType, String> {
    s.parse::<GraphType>().map_err(|e| e.to_string())
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Structural checks that clap cannot express. File existence is left to the loader.
pub fn validate(args: Args) -> Result<Args, CliError> {
    for p in args.scenario.iter().map(PathBuf::as_path).chain(Some(args.out.as_path())) {
        ensure_local_path(p)?;
    }

    for a in &args.set {
        let (k, _) = a
            .split_once('=')
            .ok_or_else(|| CliError::BadEdit(format!("--set {a} (expected key=value)")))?;
        MetricKey::parse_input(k).map_err(|e| CliError::BadEdit(format!("--set {a}: {e}")))?;
    }
    for (flag, keys) in [("--enable", &args.enable), ("--disable", &args.disable)] {
        for k in keys {
            MetricKey::parse_input(k).map_err(|e| CliError::BadEdit(format!("{flag} {k}: {e}")))?;
        }
    }

    for (i, r) in args.render.iter().enumerate() {
        if args.render[..i].contains(r) {
            return Err(CliError::DuplicateRender(r.clone()));
        }
    }
    Ok(args)
}

impl Args {
    /// Session edits in application order (preset → set → enable → disable).
    pub fn session_edits(&self) -> SessionEdits {
        SessionEdits {
            preset: self.preset,
            set: self.set.clone(),
            enable: self.enable.clone(),
            disable: self.disable.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, CliError> {
        let mut full = vec!["ea"];
        full.extend_from_slice(argv);
        validate(Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn defaults() {
        let a = parse(&[]).unwrap();
        assert_eq!(a.view, ViewMode::Summary);
        assert_eq!(a.graph, GraphType::Summary);
        assert_eq!(a.out, PathBuf::from("."));
        assert!(a.render.is_empty());
        assert!(a.session_edits().is_empty());
    }

    #[test]
    fn edits_and_modes_parse() {
        let a = parse(&[
            "--set", "winRate=25", "--set", "teamSize=8", "--enable", "eaCost", "--disable", "dealSize",
            "--preset", "conservative", "--view", "roi", "--graph", "multi", "--render", "json", "html",
        ])
        .unwrap();
        let e = a.session_edits();
        assert_eq!(e.preset, Some(Preset::Conservative));
        assert_eq!(e.set, vec!["winRate=25", "teamSize=8"]);
        assert_eq!(e.enable, vec!["eaCost"]);
        assert_eq!(a.view, ViewMode::Roi);
        assert_eq!(a.graph, GraphType::Multi);
        assert_eq!(a.render, vec!["json", "html"]);
    }

    #[test]
    fn rejects_bad_edits() {
        assert!(matches!(parse(&["--set", "winRate"]), Err(CliError::BadEdit(_))));
        assert!(matches!(parse(&["--set", "revenue=5"]), Err(CliError::BadEdit(_))));
        assert!(matches!(parse(&["--enable", "bogus"]), Err(CliError::BadEdit(_))));
    }

    #[test]
    fn rejects_remote_paths_and_duplicate_renderers() {
        assert!(matches!(parse(&["--scenario", "https://x/y.json"]), Err(CliError::NonLocalPath(_))));
        assert!(matches!(parse(&["--render", "json", "json"]), Err(CliError::DuplicateRender(_))));
        assert!(matches!(
            parse(&["--render", "json", "html", "--render", "json"]),
            Err(CliError::DuplicateRender(r)) if r == "json"
        ));
        assert!(matches!(
            parse(&["--render", "html", "--render", "html"]),
            Err(CliError::DuplicateRender(_))
        ));
    }

    #[test]
    fn clap_rejects_unknown_modes() {
        assert!(Args::try_parse_from(["ea", "--view", "pie"]).is_err());
        assert!(Args::try_parse_from(["ea", "--preset", "wild"]).is_err());
        assert!(Args::try_parse_from(["ea", "--render", "pdf"]).is_err());
    }
}
