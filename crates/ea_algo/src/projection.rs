//! crates/ea_algo/src/projection.rs
//! Current → projected values for every enabled metric, the derived revenue
//! and gross-profit rows, and the annual-benefit roll-up.
//!
//! Notes:
//! - Only enabled metrics appear in the output maps. Disabled metrics read as
//!   "no change" through `ProjectionResult::improvement_of`.
//! - Revenue exists only when pipeline, win rate and deal size are all
//!   enabled; otherwise every "current revenue" term is 0.
//! - Sales cycle and churn are reductions: improvement = current - projected.
//! - The investment denominator is always the eaCost input; the eaCost flag
//!   only controls whether it is shown as a row.

use ea_core::{EnabledSet, ImpactModel, InputSet, MetricKey, ProjectionResult, WinCount};

use crate::financials::Financials;
use crate::guard::{finite, safe_div};

/// Run the engine. Deterministic and infallible.
pub fn project(inputs: &InputSet, enabled: &EnabledSet, model: &ImpactModel) -> ProjectionResult {
    let u = &model.uplifts;
    let c = &model.couplings;
    let mut out = ProjectionResult::default();

    // ---- per-metric rows ----
    for key in enabled.keys() {
        if let Some((cur, proj)) = project_metric(key, inputs, enabled, model) {
            out.current.set(key, cur);
            out.projected.set(key, proj);
            out.improvement.set(key, improvement(key, cur, proj));
        }
    }

    // ---- revenue baseline ----
    let has_revenue = enabled.has_revenue_base();
    let current_revenue = if has_revenue {
        finite(inputs.pipeline * inputs.win_rate / 100.0)
    } else {
        0.0
    };

    // ---- revenue-coupled gains ----
    let mut revenue_gains = 0.0;
    if has_revenue {
        let projected_win_rate = out.projected.get(MetricKey::WinRate).unwrap_or(inputs.win_rate);
        revenue_gains += finite(inputs.pipeline * projected_win_rate / 100.0 - current_revenue);

        if inputs.deal_size != 0.0 {
            let new_deal_size = inputs.deal_size * (1.0 + u.deal_size);
            revenue_gains += finite(
                safe_div(inputs.pipeline, inputs.deal_size)
                    * (new_deal_size - inputs.deal_size)
                    * (inputs.win_rate / 100.0),
            );
        }
    }
    if enabled.sales_cycle {
        revenue_gains += finite(current_revenue * u.sales_cycle.abs());
    }

    // ---- benefit-coupled gains ----
    let mut benefit = 0.0;
    if enabled.retention {
        benefit += current_revenue * u.retention * c.retention_benefit;
    }
    if enabled.gross_margin {
        benefit += (current_revenue + revenue_gains) * u.gross_margin * (inputs.gross_margin / 100.0);
    }
    if enabled.expansion {
        benefit += current_revenue * u.expansion * (inputs.expansion / 100.0);
    }
    if enabled.arr {
        benefit += c.arr_benefit * out.improvement_of(MetricKey::Arr);
    }
    if enabled.nps {
        benefit += current_revenue * u.nps * c.nps_benefit;
    }
    if enabled.churn {
        benefit += current_revenue * u.churn.abs() * (inputs.churn / 100.0);
    }
    let benefit = finite(benefit + revenue_gains);

    // ---- derived rows ----
    if has_revenue {
        let projected_revenue = finite(current_revenue + revenue_gains);
        out.current.set(MetricKey::Revenue, current_revenue);
        out.projected.set(MetricKey::Revenue, projected_revenue);
        out.improvement.set(MetricKey::Revenue, revenue_gains);

        if inputs.deal_size != 0.0 {
            let projected_deal_size = out.projected.get(MetricKey::DealSize).unwrap_or(inputs.deal_size);
            out.wins = Some(WinCount {
                current: safe_div(current_revenue, inputs.deal_size),
                projected: safe_div(projected_revenue, projected_deal_size),
            });
        }

        if enabled.gross_margin {
            let projected_margin = out.projected.get(MetricKey::GrossMargin).unwrap_or(inputs.gross_margin);
            let gp_now = finite(current_revenue * inputs.gross_margin / 100.0);
            let gp_then = finite(projected_revenue * projected_margin / 100.0);
            out.current.set(MetricKey::GrossProfit, gp_now);
            out.projected.set(MetricKey::GrossProfit, gp_then);
            out.improvement.set(MetricKey::GrossProfit, finite(gp_then - gp_now));
        }
    }

    // ---- scalars ----
    let cost = inputs.ea_cost;
    let fin = Financials::compute(benefit, cost, c);
    out.revenue_gains = finite(revenue_gains);
    out.total_annual_benefit = benefit;
    out.investment_cost = cost;
    out.roi = fin.roi;
    out.payback_months = fin.payback_months;
    out.net_present_value = fin.net_present_value;
    out
}

/// `(current, projected)` for one input metric under the given flags.
/// `None` for derived keys.
pub fn project_metric(
    key: MetricKey,
    inputs: &InputSet,
    enabled: &EnabledSet,
    model: &ImpactModel,
) -> Option<(f64, f64)> {
    let u = &model.uplifts;
    let c = &model.couplings;
    let cl = &model.clamps;
    let cur = inputs.get(key)?;
    let scaled = |uplift: f64| cur * (1.0 + uplift);

    let proj = match key {
        MetricKey::Pipeline | MetricKey::SalesReps | MetricKey::EaCost => cur,
        MetricKey::WinRate => scaled(u.win_rate),
        MetricKey::DealSize => scaled(u.deal_size),
        MetricKey::SalesCycle => scaled(u.sales_cycle),
        MetricKey::Expansion => scaled(u.expansion),
        MetricKey::Retention => scaled(u.retention).min(cl.retention_cap),
        MetricKey::GrossMargin => scaled(u.gross_margin).min(cl.gross_margin_cap),
        MetricKey::Nps => scaled(u.nps).min(cl.nps_cap),
        MetricKey::Churn => scaled(u.churn).max(cl.churn_floor),
        MetricKey::Arr => {
            let mut m = u.arr;
            if enabled.win_rate {
                m += c.arr_from_win_rate * u.win_rate;
            }
            if enabled.expansion {
                m += c.arr_from_expansion * u.expansion;
            }
            scaled(m)
        }
        MetricKey::Cltv => {
            let mut m = u.cltv;
            if enabled.retention {
                m += c.cltv_from_retention * u.retention;
            }
            scaled(m)
        }
        MetricKey::Revenue | MetricKey::GrossProfit | MetricKey::Roi | MetricKey::PaybackMonths => {
            return None
        }
    };
    Some((finite(cur), finite(proj)))
}

#[inline]
fn improvement(key: MetricKey, cur: f64, proj: f64) -> f64 {
    if key.reduction_is_good() {
        finite(cur - proj)
    } else {
        finite(proj - cur)
    }
}
