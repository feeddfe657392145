//! Financial scalars derived from annual benefit and investment cost.
//!
//! Notes:
//! - ROI is a percent of cost; payback is in months.
//! - The value projection is undiscounted: `benefit * periods - cost`.
//! - Zero cost yields ROI 0; non-positive benefit yields payback 0.

use ea_core::Couplings;

use crate::guard::{finite, safe_div};

/// Bundle of the three scalars the result carries.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Financials {
    pub roi: f64,
    pub payback_months: f64,
    pub net_present_value: f64,
}

impl Financials {
    pub fn compute(benefit: f64, cost: f64, couplings: &Couplings) -> Self {
        Self {
            roi: roi_percent(benefit, cost),
            payback_months: payback_months(benefit, cost),
            net_present_value: net_present_value(benefit, cost, couplings.npv_periods),
        }
    }
}

pub fn roi_percent(benefit: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        safe_div(benefit - cost, cost) * 100.0
    } else {
        0.0
    }
}

pub fn payback_months(benefit: f64, cost: f64) -> f64 {
    if benefit > 0.0 {
        safe_div(cost, benefit) * 12.0
    } else {
        0.0
    }
}

pub fn net_present_value(benefit: f64, cost: f64, periods: f64) -> f64 {
    finite(benefit * periods - cost)
}
