// crates/ea_report/src/render_html.rs
//
// Self-contained HTML report: inline CSS, no scripts, no external assets.
// Charts are horizontal div bars whose widths are percentages of the
// largest magnitude in the same chart.
// Section order: title → cards → chart → metrics table → ROI → integrity footer.

use std::fmt::Write as _;

use crate::format::one_decimal;
use crate::structure::{Bar, Chart, IntegrityBlock, MetricBars, MetricDetail, MultiPoint, ReportModel, RoiBlock, SummaryCard};

const CURRENT_COLOR: &str = "#94A3B8";

// ------------------------- helpers -------------------------

fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Bar width in percent of `max`, clamped to [0, 100].
fn width_pct(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value.abs() / max * 100.0).clamp(0.0, 100.0)
}

fn max_abs<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().filter(|v| v.is_finite()).fold(0.0, |m, v| m.max(v.abs()))
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder {
    buf: String,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(16 * 1024) }
    }

    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;}}\
             h1,h2,h3{{margin:0.2em 0;}}\
             .grid{{display:grid;grid-template-columns:repeat(3,minmax(0,1fr));gap:8px}}\
             .card{{padding:12px;border-radius:8px;background:#F1F5F9}}\
             .card .v{{font-size:1.4em;font-weight:600}}\
             .row{{display:flex;align-items:center;gap:8px;margin:2px 0}}\
             .row .n{{width:220px}}\
             .bar{{height:14px;border-radius:3px}}\
             .muted{{opacity:0.8}}\
             table{{border-collapse:collapse}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             </style></head><body>",
            esc(title)
        );
        let _ = write!(self.buf, "<h1>{}</h1>", esc(title));
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>\n");
        self.buf
    }

    pub fn section_cards(&mut self, cards: &[SummaryCard]) {
        if cards.is_empty() {
            return;
        }
        self.buf.push_str("<div class=\"grid\">");
        for c in cards {
            let _ = write!(
                self.buf,
                "<div class=\"card\"><div class=\"muted\">{}</div><div class=\"v\">{}</div></div>",
                esc(c.label),
                esc(&c.display)
            );
        }
        self.buf.push_str("</div>");
    }

    fn bar_row(&mut self, name: &str, value_text: &str, width: f64, color: &str) {
        let _ = write!(
            self.buf,
            "<div class=\"row\"><span class=\"n\">{}</span>\
             <div class=\"bar\" style=\"width:{:.1}%;background:{}\"></div>\
             <span>{}</span></div>",
            esc(name),
            width,
            esc(color),
            esc(value_text)
        );
    }

    fn metric_bars(&mut self, mb: &MetricBars) {
        let _ = write!(self.buf, "<h3>{}</h3>", esc(mb.label));
        self.bars(&mb.bars, mb.color);
    }

    fn bars(&mut self, bars: &[Bar], color: &str) {
        let max = max_abs(bars.iter().map(|b| b.value));
        for (i, b) in bars.iter().enumerate() {
            let c = if i == 0 { CURRENT_COLOR } else { color };
            self.bar_row(b.name, &one_decimal(b.value), width_pct(b.value, max), c);
        }
    }

    fn multi(&mut self, points: &[MultiPoint]) {
        self.buf.push_str("<h3>Improvement by metric (%)</h3>");
        let max = max_abs(points.iter().map(|p| p.improvement_pct));
        for p in points {
            let text = format!("{}%", one_decimal(p.improvement_pct));
            self.bar_row(p.label, &text, width_pct(p.improvement_pct, max), p.color);
        }
    }

    pub fn section_chart(&mut self, chart: &Chart) {
        self.buf.push_str("<h2>Chart</h2>");
        match chart {
            Chart::Primary(mb) => self.metric_bars(mb),
            Chart::Multi(points) => self.multi(points),
            Chart::PerMetric(all) => {
                for mb in all {
                    self.metric_bars(mb);
                }
            }
        }
    }

    pub fn section_metrics(&mut self, rows: &[MetricDetail]) {
        if rows.is_empty() {
            return;
        }
        self.buf.push_str(
            "<h2>Metrics</h2><table><thead><tr><th>Metric</th><th>Current</th>\
             <th>With EA</th><th>Improvement</th></tr></thead><tbody>",
        );
        for d in rows {
            let _ = write!(
                self.buf,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                esc(d.label),
                esc(&d.current),
                esc(&d.projected),
                esc(&d.improvement)
            );
        }
        self.buf.push_str("</tbody></table>");
    }

    pub fn section_roi(&mut self, r: &RoiBlock) {
        let _ = write!(
            self.buf,
            "<h2>Return on Investment</h2><table><tbody>\
             <tr><td>Investment</td><td>{}</td></tr>\
             <tr><td>Annual Benefit</td><td>{}</td></tr>\
             <tr><td>ROI</td><td>{}</td></tr>\
             <tr><td>Payback</td><td>{}</td></tr>\
             <tr><td>Net Present Value</td><td>{}</td></tr>\
             </tbody></table><h3>Projection</h3>",
            esc(&r.investment),
            esc(&r.annual_benefit),
            esc(&r.roi),
            esc(&r.payback),
            esc(&r.net_present_value)
        );
        let max = max_abs(r.projection.iter().map(|p| p.cumulative));
        for p in &r.projection {
            self.bar_row(&p.label, &one_decimal(p.cumulative), width_pct(p.cumulative, max), "#7C3AED");
        }
    }

    pub fn section_integrity(&mut self, i: &IntegrityBlock) {
        let _ = write!(
            self.buf,
            "<footer class=\"muted\"><p>Projection {} · Model {} · Preset {}<br>Scenario sha256 {}<br>{}</p></footer>",
            esc(&i.projection_id),
            esc(&i.model_id),
            esc(&i.preset),
            esc(&i.scenario_sha256),
            esc(&i.engine)
        );
    }
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the whole model to one HTML document.
pub fn render_html(m: &ReportModel) -> String {
    let mut b = HtmlBuilder::new();
    b.start(&m.title);
    b.section_cards(&m.cards);
    if let Some(c) = &m.chart {
        b.section_chart(c);
    }
    b.section_metrics(&m.metrics);
    if let Some(r) = &m.roi {
        b.section_roi(r);
    }
    b.section_integrity(&m.integrity);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{build_model, GraphType, ViewMode};
    use ea_core::{EnabledSet, MetricCatalog, MetricKey, ProjectionResult};

    #[test]
    fn escapes_text() {
        assert_eq!(esc("<a href='x'>&</a>"), "&lt;a href=&#x27;x&#x27;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn widths_are_relative_and_clamped() {
        assert_eq!(width_pct(50.0, 200.0), 25.0);
        assert_eq!(width_pct(-200.0, 200.0), 100.0);
        assert_eq!(width_pct(5.0, 0.0), 0.0);
        assert_eq!(max_abs([1.0, -3.0, f64::NAN]), 3.0);
    }

    #[test]
    fn summary_page_contains_cards_and_bars() {
        let mut r = ProjectionResult::default();
        r.current.set(MetricKey::Revenue, 200_000.0);
        r.projected.set(MetricKey::Revenue, 270_000.0);
        r.improvement.set(MetricKey::Revenue, 70_000.0);
        let en = EnabledSet::default();
        let m = build_model(
            &r,
            &en,
            &MetricCatalog::standard(),
            ViewMode::Summary,
            GraphType::Summary,
            IntegrityBlock { projection_id: "PRJ:abc".into(), ..IntegrityBlock::default() },
        );
        let html = render_html(&m);
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Additional Revenue"));
        assert!(html.contains("$70,000"));
        assert!(html.contains("With EA"));
        assert!(html.contains("width:100.0%"));
        assert!(html.contains("PRJ:abc"));
        assert!(!html.contains("<script"));
    }
}
