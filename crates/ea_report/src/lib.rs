//! ea_report: presentation layer for projection results.
//!
//! Notes:
//!   • Reads an already-computed `ProjectionResult`; never recomputes engine values.
//!   • `structure` maps a result into a `ReportModel` (cards, chart series, ROI line).
//!   • Renderers are feature-gated: `render_json` (ordered JSON), `render_html` (self-contained page).

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod format;
pub mod structure;

#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_html")]
pub mod render_html;

pub use format::{format_currency, format_value, one_decimal, NOT_AVAILABLE};
pub use structure::{
    available_metrics, build_model, multi_metric_chart, primary_metric, roi_projection, single_metric_bars,
    summary_cards, Bar, Chart, GraphType, IntegrityBlock, MetricBars, MetricDetail, MultiPoint, ReportModel,
    RoiBlock, RoiPoint, SummaryCard, ViewMode, ROI_FACTORS,
};

#[cfg(feature = "render_json")]
pub use render_json::{render_json, report_value};

#[cfg(feature = "render_html")]
pub use render_html::render_html;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown presentation mode: {0}")]
    UnknownMode(String),
    #[error("serialize: {0}")]
    Serialize(String),
}
