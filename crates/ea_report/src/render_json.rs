//! report.json renderer.
//!
//! Section order: meta → cards → chart → metrics → roi → integrity.
//! Key order inside objects is insertion order (`serde_json/preserve_order`).
//! Empty sections are omitted.

use serde_json::{Map as JsonMap, Value};

use crate::structure::{Bar, Chart, IntegrityBlock, MetricBars, MetricDetail, ReportModel, RoiBlock, SummaryCard};
use crate::ReportError;

/// Pretty-printed report JSON with a trailing newline.
pub fn render_json(m: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(&report_value(m)).map_err(|e| ReportError::Serialize(e.to_string()))?;
    s.push('\n');
    Ok(s)
}

pub fn report_value(m: &ReportModel) -> Value {
    let mut root = obj();

    let mut meta = obj();
    meta.insert("title".into(), Value::String(m.title.clone()));
    meta.insert("view".into(), m.view.as_str().into());
    meta.insert("graph".into(), m.graph.as_str().into());
    root.insert("meta".into(), Value::Object(meta));

    if !m.cards.is_empty() {
        root.insert("cards".into(), Value::Array(m.cards.iter().map(card_json).collect()));
    }
    if let Some(c) = &m.chart {
        root.insert("chart".into(), chart_json(c));
    }
    if !m.metrics.is_empty() {
        root.insert("metrics".into(), Value::Array(m.metrics.iter().map(detail_json).collect()));
    }
    if let Some(r) = &m.roi {
        root.insert("roi".into(), roi_json(r));
    }
    root.insert("integrity".into(), integrity_json(&m.integrity));

    Value::Object(root)
}

/* ----------------------- sections ----------------------- */

fn card_json(c: &SummaryCard) -> Value {
    let mut o = obj();
    o.insert("label".into(), c.label.into());
    o.insert("value".into(), num(c.value));
    o.insert("display".into(), Value::String(c.display.clone()));
    Value::Object(o)
}

fn chart_json(c: &Chart) -> Value {
    let mut o = obj();
    match c {
        Chart::Primary(b) => {
            o.insert("type".into(), "summary".into());
            o.insert("series".into(), Value::Array(vec![metric_bars_json(b)]));
        }
        Chart::Multi(points) => {
            o.insert("type".into(), "multi".into());
            let series = points
                .iter()
                .map(|p| {
                    let mut s = obj();
                    s.insert("key".into(), p.key.as_str().into());
                    s.insert("label".into(), p.label.into());
                    s.insert("color".into(), p.color.into());
                    s.insert("current".into(), num(p.current));
                    s.insert("projected".into(), num(p.projected));
                    s.insert("improvementPct".into(), num(p.improvement_pct));
                    Value::Object(s)
                })
                .collect();
            o.insert("series".into(), Value::Array(series));
        }
        Chart::PerMetric(all) => {
            o.insert("type".into(), "detailed".into());
            o.insert("series".into(), Value::Array(all.iter().map(metric_bars_json).collect()));
        }
    }
    Value::Object(o)
}

fn metric_bars_json(b: &MetricBars) -> Value {
    let mut o = obj();
    o.insert("key".into(), b.key.as_str().into());
    o.insert("label".into(), b.label.into());
    o.insert("color".into(), b.color.into());
    o.insert("bars".into(), bars_json(&b.bars));
    Value::Object(o)
}

fn bars_json(bars: &[Bar]) -> Value {
    Value::Array(
        bars.iter()
            .map(|b| {
                let mut o = obj();
                o.insert("name".into(), b.name.into());
                o.insert("value".into(), num(b.value));
                Value::Object(o)
            })
            .collect(),
    )
}

fn detail_json(d: &MetricDetail) -> Value {
    let mut o = obj();
    o.insert("key".into(), d.key.as_str().into());
    o.insert("label".into(), d.label.into());
    o.insert("current".into(), Value::String(d.current.clone()));
    o.insert("projected".into(), Value::String(d.projected.clone()));
    o.insert("improvement".into(), Value::String(d.improvement.clone()));
    o.insert("bars".into(), bars_json(&d.bars));
    Value::Object(o)
}

fn roi_json(r: &RoiBlock) -> Value {
    let mut o = obj();
    o.insert("investment".into(), Value::String(r.investment.clone()));
    o.insert("annualBenefit".into(), Value::String(r.annual_benefit.clone()));
    o.insert("roi".into(), Value::String(r.roi.clone()));
    o.insert("payback".into(), Value::String(r.payback.clone()));
    o.insert("netPresentValue".into(), Value::String(r.net_present_value.clone()));
    let line = r
        .projection
        .iter()
        .map(|p| {
            let mut y = obj();
            y.insert("period".into(), p.period.into());
            y.insert("label".into(), Value::String(p.label.clone()));
            y.insert("value".into(), num(p.value));
            y.insert("cumulative".into(), num(p.cumulative));
            y.insert("net".into(), num(p.net));
            Value::Object(y)
        })
        .collect();
    o.insert("projection".into(), Value::Array(line));
    Value::Object(o)
}

fn integrity_json(i: &IntegrityBlock) -> Value {
    let mut o = obj();
    o.insert("projectionId".into(), Value::String(i.projection_id.clone()));
    o.insert("modelId".into(), Value::String(i.model_id.clone()));
    o.insert("preset".into(), Value::String(i.preset.clone()));
    o.insert("scenarioSha256".into(), Value::String(i.scenario_sha256.clone()));
    o.insert("engine".into(), Value::String(i.engine.clone()));
    Value::Object(o)
}

/* ----------------------- helpers ----------------------- */

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}

/// Non-finite values become `null`.
fn num(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}
