//! Session state: the numeric `InputSet` and the `EnabledSet` of flags.
//!
//! Both are owned by the caller, edited one field at a time, and only read by
//! the engine. Derived keys have no slot in either structure.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::metrics::MetricKey;

/// Coerce free-form field text to a number the way the input form does:
/// blank → 0, numeric text → its value, anything else (or non-finite) → 0.
pub fn coerce_text(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Map non-finite values to 0 so nothing downstream ever sees NaN/∞.
#[inline]
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// One numeric field per input metric.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct InputSet {
    pub pipeline: f64,
    pub deal_size: f64,
    /// Percent (20 means 20%).
    pub win_rate: f64,
    #[cfg_attr(feature = "serde", serde(alias = "teamSize"))]
    pub sales_reps: f64,
    /// Months.
    pub sales_cycle: f64,
    pub retention: f64,
    pub gross_margin: f64,
    pub expansion: f64,
    pub arr: f64,
    pub nps: f64,
    pub ea_cost: f64,
    pub churn: f64,
    pub cltv: f64,
}

impl Default for InputSet {
    fn default() -> Self {
        Self {
            pipeline: 1_000_000.0,
            deal_size: 100_000.0,
            win_rate: 20.0,
            sales_reps: 5.0,
            sales_cycle: 6.0,
            retention: 85.0,
            gross_margin: 70.0,
            expansion: 15.0,
            arr: 500_000.0,
            nps: 30.0,
            ea_cost: 200_000.0,
            churn: 15.0,
            cltv: 300_000.0,
        }
    }
}

impl InputSet {
    /// All fields zero; handy as a base for sparse scenarios.
    pub fn zeroed() -> Self {
        Self {
            pipeline: 0.0,
            deal_size: 0.0,
            win_rate: 0.0,
            sales_reps: 0.0,
            sales_cycle: 0.0,
            retention: 0.0,
            gross_margin: 0.0,
            expansion: 0.0,
            arr: 0.0,
            nps: 0.0,
            ea_cost: 0.0,
            churn: 0.0,
            cltv: 0.0,
        }
    }

    /// Read an input field; `None` for derived keys.
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        let v = match key {
            MetricKey::Pipeline => self.pipeline,
            MetricKey::DealSize => self.deal_size,
            MetricKey::WinRate => self.win_rate,
            MetricKey::SalesReps => self.sales_reps,
            MetricKey::SalesCycle => self.sales_cycle,
            MetricKey::Retention => self.retention,
            MetricKey::GrossMargin => self.gross_margin,
            MetricKey::Expansion => self.expansion,
            MetricKey::Arr => self.arr,
            MetricKey::Nps => self.nps,
            MetricKey::EaCost => self.ea_cost,
            MetricKey::Churn => self.churn,
            MetricKey::Cltv => self.cltv,
            MetricKey::Revenue
            | MetricKey::GrossProfit
            | MetricKey::Roi
            | MetricKey::PaybackMonths => return None,
        };
        Some(v)
    }

    /// Write one field. Non-finite values are stored as 0.
    pub fn set(&mut self, key: MetricKey, value: f64) -> Result<(), CoreError> {
        let v = finite_or_zero(value);
        let slot = match key {
            MetricKey::Pipeline => &mut self.pipeline,
            MetricKey::DealSize => &mut self.deal_size,
            MetricKey::WinRate => &mut self.win_rate,
            MetricKey::SalesReps => &mut self.sales_reps,
            MetricKey::SalesCycle => &mut self.sales_cycle,
            MetricKey::Retention => &mut self.retention,
            MetricKey::GrossMargin => &mut self.gross_margin,
            MetricKey::Expansion => &mut self.expansion,
            MetricKey::Arr => &mut self.arr,
            MetricKey::Nps => &mut self.nps,
            MetricKey::EaCost => &mut self.ea_cost,
            MetricKey::Churn => &mut self.churn,
            MetricKey::Cltv => &mut self.cltv,
            MetricKey::Revenue
            | MetricKey::GrossProfit
            | MetricKey::Roi
            | MetricKey::PaybackMonths => return Err(CoreError::NotAnInput(key.as_str())),
        };
        *slot = v;
        Ok(())
    }

    /// Apply a `key=value` assignment (value coerced like form text).
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<MetricKey, CoreError> {
        let (k, v) = assignment
            .split_once('=')
            .ok_or_else(|| CoreError::BadOverride(assignment.to_string()))?;
        let key = MetricKey::parse_input(k)?;
        self.set(key, coerce_text(v))?;
        Ok(key)
    }
}

/// One flag per input metric.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct EnabledSet {
    pub pipeline: bool,
    pub deal_size: bool,
    pub win_rate: bool,
    #[cfg_attr(feature = "serde", serde(alias = "teamSize"))]
    pub sales_reps: bool,
    pub sales_cycle: bool,
    pub retention: bool,
    pub gross_margin: bool,
    pub expansion: bool,
    pub arr: bool,
    pub nps: bool,
    pub ea_cost: bool,
    pub churn: bool,
    pub cltv: bool,
}

impl Default for EnabledSet {
    fn default() -> Self {
        let mut s = Self::none();
        s.pipeline = true;
        s.deal_size = true;
        s.win_rate = true;
        s
    }
}

impl EnabledSet {
    pub fn none() -> Self {
        Self {
            pipeline: false,
            deal_size: false,
            win_rate: false,
            sales_reps: false,
            sales_cycle: false,
            retention: false,
            gross_margin: false,
            expansion: false,
            arr: false,
            nps: false,
            ea_cost: false,
            churn: false,
            cltv: false,
        }
    }

    pub fn all() -> Self {
        let mut s = Self::none();
        for k in MetricKey::INPUTS {
            // INPUTS never contains derived keys
            let _ = s.set(k, true);
        }
        s
    }

    /// Build from a list of keys; everything else disabled.
    pub fn only(keys: &[MetricKey]) -> Result<Self, CoreError> {
        let mut s = Self::none();
        for k in keys {
            s.set(*k, true)?;
        }
        Ok(s)
    }

    /// Derived keys are never "enabled".
    pub fn is_enabled(&self, key: MetricKey) -> bool {
        match key {
            MetricKey::Pipeline => self.pipeline,
            MetricKey::DealSize => self.deal_size,
            MetricKey::WinRate => self.win_rate,
            MetricKey::SalesReps => self.sales_reps,
            MetricKey::SalesCycle => self.sales_cycle,
            MetricKey::Retention => self.retention,
            MetricKey::GrossMargin => self.gross_margin,
            MetricKey::Expansion => self.expansion,
            MetricKey::Arr => self.arr,
            MetricKey::Nps => self.nps,
            MetricKey::EaCost => self.ea_cost,
            MetricKey::Churn => self.churn,
            MetricKey::Cltv => self.cltv,
            MetricKey::Revenue
            | MetricKey::GrossProfit
            | MetricKey::Roi
            | MetricKey::PaybackMonths => false,
        }
    }

    pub fn set(&mut self, key: MetricKey, on: bool) -> Result<(), CoreError> {
        let slot = match key {
            MetricKey::Pipeline => &mut self.pipeline,
            MetricKey::DealSize => &mut self.deal_size,
            MetricKey::WinRate => &mut self.win_rate,
            MetricKey::SalesReps => &mut self.sales_reps,
            MetricKey::SalesCycle => &mut self.sales_cycle,
            MetricKey::Retention => &mut self.retention,
            MetricKey::GrossMargin => &mut self.gross_margin,
            MetricKey::Expansion => &mut self.expansion,
            MetricKey::Arr => &mut self.arr,
            MetricKey::Nps => &mut self.nps,
            MetricKey::EaCost => &mut self.ea_cost,
            MetricKey::Churn => &mut self.churn,
            MetricKey::Cltv => &mut self.cltv,
            MetricKey::Revenue
            | MetricKey::GrossProfit
            | MetricKey::Roi
            | MetricKey::PaybackMonths => return Err(CoreError::NotAnInput(key.as_str())),
        };
        *slot = on;
        Ok(())
    }

    pub fn toggle(&mut self, key: MetricKey) -> Result<bool, CoreError> {
        let next = !self.is_enabled(key);
        self.set(key, next)?;
        Ok(next)
    }

    /// Enabled input keys in form order.
    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        MetricKey::INPUTS.into_iter().filter(move |k| self.is_enabled(*k))
    }

    pub fn count(&self) -> usize {
        self.keys().count()
    }

    /// Revenue is only modelled when all three funnel inputs are on.
    pub fn has_revenue_base(&self) -> bool {
        self.pipeline && self.win_rate && self.deal_size
    }
}
