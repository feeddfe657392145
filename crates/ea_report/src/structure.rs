//! crates/ea_report/src/structure.rs
//! Report data model + mappers from a projection result.
//! No I/O, no recomputation of engine values; only selection, ordering and formatting.

use core::fmt;
use core::str::FromStr;

use ea_core::{EnabledSet, MetricCatalog, MetricKey, ProjectionResult, UnitKind};

use crate::format::{format_value, one_decimal};
use crate::ReportError;

// -------------------- Presentation modes --------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum ViewMode {
    #[default]
    Summary,
    Detailed,
    Roi,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum GraphType {
    #[default]
    Summary,
    Multi,
    Detailed,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Summary => "summary",
            ViewMode::Detailed => "detailed",
            ViewMode::Roi => "roi",
        }
    }
}

impl GraphType {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphType::Summary => "summary",
            GraphType::Multi => "multi",
            GraphType::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ReportError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(ViewMode::Summary),
            "detailed" => Ok(ViewMode::Detailed),
            "roi" => Ok(ViewMode::Roi),
            other => Err(ReportError::UnknownMode(other.to_string())),
        }
    }
}

impl FromStr for GraphType {
    type Err = ReportError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(GraphType::Summary),
            "multi" => Ok(GraphType::Multi),
            "detailed" => Ok(GraphType::Detailed),
            other => Err(ReportError::UnknownMode(other.to_string())),
        }
    }
}

// -------------------- Model root & sections --------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ReportModel {
    pub title: String,
    pub view: ViewMode,
    pub graph: GraphType,
    /// Summary view only.
    pub cards: Vec<SummaryCard>,
    /// Summary view only; `None` when the selected graph has no data.
    pub chart: Option<Chart>,
    /// Detailed view only.
    pub metrics: Vec<MetricDetail>,
    /// ROI view only; `None` when the investment metric is disabled.
    pub roi: Option<RoiBlock>,
    pub integrity: IntegrityBlock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricBars {
    pub key: MetricKey,
    pub label: &'static str,
    pub color: &'static str,
    pub bars: Vec<Bar>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultiPoint {
    pub key: MetricKey,
    pub label: &'static str,
    pub color: &'static str,
    pub current: f64,
    pub projected: f64,
    /// Sign-normalized percent change (positive = better).
    pub improvement_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Chart {
    Primary(MetricBars),
    Multi(Vec<MultiPoint>),
    PerMetric(Vec<MetricBars>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricDetail {
    pub key: MetricKey,
    pub label: &'static str,
    pub unit: UnitKind,
    pub color: &'static str,
    pub current: String,
    pub projected: String,
    pub improvement: String,
    pub bars: Vec<Bar>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoiPoint {
    pub period: u32,
    pub label: String,
    pub value: f64,
    pub cumulative: f64,
    /// Cumulative benefit less the investment.
    pub net: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoiBlock {
    pub investment: String,
    pub annual_benefit: String,
    pub roi: String,
    pub payback: String,
    pub net_present_value: String,
    pub projection: Vec<RoiPoint>,
}

/// Provenance echoed at the bottom of every report; supplied by the caller.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct IntegrityBlock {
    pub projection_id: String,
    pub model_id: String,
    pub preset: String,
    pub scenario_sha256: String,
    pub engine: String,
}

// -------------------- Selectors --------------------

const PRIMARY_PRIORITY: [MetricKey; 7] = [
    MetricKey::Revenue,
    MetricKey::SalesCycle,
    MetricKey::Retention,
    MetricKey::Arr,
    MetricKey::Nps,
    MetricKey::WinRate,
    MetricKey::DealSize,
];

/// Per-period multipliers of the annual benefit.
pub const ROI_FACTORS: [f64; 3] = [1.0, 1.1, 1.2];

fn has_data(result: &ProjectionResult, key: MetricKey) -> bool {
    matches!(result.current.get(key), Some(v) if v != 0.0) && result.projected.contains(key)
}

/// First metric in priority order with a non-zero current value.
pub fn primary_metric(result: &ProjectionResult) -> Option<MetricKey> {
    PRIMARY_PRIORITY.into_iter().find(|k| has_data(result, *k))
}

/// Enabled inputs with rows (form order), then revenue and gross profit when non-zero.
pub fn available_metrics(result: &ProjectionResult, enabled: &EnabledSet) -> Vec<MetricKey> {
    let mut out: Vec<MetricKey> = enabled.keys().filter(|k| result.row(*k).is_some()).collect();
    for k in [MetricKey::Revenue, MetricKey::GrossProfit] {
        if has_data(result, k) {
            out.push(k);
        }
    }
    out
}

pub fn summary_cards(result: &ProjectionResult, enabled: &EnabledSet) -> Vec<SummaryCard> {
    let mut cards = Vec::new();
    if has_data(result, MetricKey::Revenue) {
        let revenue = result.improvement_of(MetricKey::Revenue);
        cards.push(SummaryCard {
            label: "Additional Revenue",
            value: revenue,
            display: format_value(Some(revenue), UnitKind::Currency),
        });
    }
    let cycle = result.improvement_of(MetricKey::SalesCycle);
    if enabled.sales_cycle && cycle != 0.0 {
        cards.push(SummaryCard {
            label: "Cycle Reduction",
            value: cycle,
            display: format!("{} mo", one_decimal(cycle)),
        });
    }
    if enabled.ea_cost && result.roi != 0.0 {
        cards.push(SummaryCard {
            label: "ROI",
            value: result.roi,
            display: format_value(Some(result.roi), UnitKind::Percentage),
        });
    }
    cards
}

/// Two bars (current, with investment); empty when the metric has no row.
pub fn single_metric_bars(result: &ProjectionResult, key: MetricKey) -> Vec<Bar> {
    match (result.current.get(key), result.projected.get(key)) {
        (Some(c), Some(p)) => vec![Bar { name: "Current", value: c }, Bar { name: "With EA", value: p }],
        _ => Vec::new(),
    }
}

fn metric_bars(result: &ProjectionResult, catalog: &MetricCatalog, key: MetricKey) -> MetricBars {
    let d = catalog.get(key);
    MetricBars { key, label: d.label, color: d.color, bars: single_metric_bars(result, key) }
}

/// Percent-improvement series over every row (inputs in form order, then derived).
pub fn multi_metric_chart(result: &ProjectionResult, catalog: &MetricCatalog) -> Vec<MultiPoint> {
    result
        .keys()
        .filter_map(|k| {
            let row = result.row(k)?;
            let d = catalog.get(k);
            Some(MultiPoint {
                key: k,
                label: d.label,
                color: d.color,
                current: row.current,
                projected: row.projected,
                improvement_pct: result.percent_improvement(k).unwrap_or(0.0),
            })
        })
        .collect()
}

/// Three-period benefit line with cumulative and net-of-investment totals.
pub fn roi_projection(result: &ProjectionResult) -> Vec<RoiPoint> {
    let mut cumulative = 0.0;
    ROI_FACTORS
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let value = result.total_annual_benefit * f;
            cumulative += value;
            RoiPoint {
                period: i as u32 + 1,
                label: format!("Year {}", i + 1),
                value,
                cumulative,
                net: cumulative - result.investment_cost,
            }
        })
        .collect()
}

fn roi_block(result: &ProjectionResult) -> RoiBlock {
    RoiBlock {
        investment: format_value(Some(result.investment_cost), UnitKind::Currency),
        annual_benefit: format_value(Some(result.total_annual_benefit), UnitKind::Currency),
        roi: format_value(Some(result.roi), UnitKind::Percentage),
        payback: format!("{} months", format_value(Some(result.payback_months), UnitKind::Number)),
        net_present_value: format_value(Some(result.net_present_value), UnitKind::Currency),
        projection: roi_projection(result),
    }
}

fn metric_detail(result: &ProjectionResult, catalog: &MetricCatalog, key: MetricKey) -> MetricDetail {
    let d = catalog.get(key);
    MetricDetail {
        key,
        label: d.label,
        unit: d.unit,
        color: d.color,
        current: format_value(result.current.get(key), d.unit),
        projected: format_value(result.projected.get(key), d.unit),
        improvement: format_value(result.improvement.get(key), d.unit),
        bars: single_metric_bars(result, key),
    }
}

// -------------------- Build --------------------

/// Assemble the sections needed for `view` (and `graph`, in the summary view).
pub fn build_model(
    result: &ProjectionResult,
    enabled: &EnabledSet,
    catalog: &MetricCatalog,
    view: ViewMode,
    graph: GraphType,
    integrity: IntegrityBlock,
) -> ReportModel {
    let mut model = ReportModel {
        title: "EA Impact Report".to_string(),
        view,
        graph,
        cards: Vec::new(),
        chart: None,
        metrics: Vec::new(),
        roi: None,
        integrity,
    };

    match view {
        ViewMode::Summary => {
            model.cards = summary_cards(result, enabled);
            model.chart = match graph {
                GraphType::Summary => primary_metric(result).map(|k| Chart::Primary(metric_bars(result, catalog, k))),
                GraphType::Multi => {
                    let pts = multi_metric_chart(result, catalog);
                    (!pts.is_empty()).then_some(Chart::Multi(pts))
                }
                GraphType::Detailed => Some(Chart::PerMetric(
                    available_metrics(result, enabled)
                        .into_iter()
                        .map(|k| metric_bars(result, catalog, k))
                        .collect(),
                )),
            };
        }
        ViewMode::Detailed => {
            model.metrics = available_metrics(result, enabled)
                .into_iter()
                .map(|k| metric_detail(result, catalog, k))
                .collect();
        }
        ViewMode::Roi => {
            if enabled.ea_cost {
                model.roi = Some(roi_block(result));
            }
        }
    }
    model
}
