//! Impact model: uplift table, coupling weights, clamps, and named presets.
//!
//! Notes:
//! - Every constant the engine uses lives here and is passed to it by
//!   parameter; nothing is read from ambient state.
//! - `Preset::Standard` is the complete model (win-rate, gross-margin, ARR and
//!   CLTV uplifts present). `Preset::Conservative` keeps the smaller, earlier
//!   magnitudes and has no own uplift for gross margin, ARR or CLTV.
//! - Negative uplifts mean "reduces" (sales cycle, churn).

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::metrics::MetricKey;

/// Named uplift table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preset {
    #[default]
    Standard,
    Conservative,
}

impl Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::Conservative => "conservative",
        }
    }

    pub fn uplifts(self) -> UpliftTable {
        match self {
            Preset::Standard => UpliftTable::standard(),
            Preset::Conservative => UpliftTable::conservative(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard" => Ok(Preset::Standard),
            "conservative" => Ok(Preset::Conservative),
            other => Err(CoreError::UnknownPreset(other.to_string())),
        }
    }
}

/// Signed fractional multipliers (0.35 = +35%).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default, deny_unknown_fields))]
pub struct UpliftTable {
    pub win_rate: f64,
    pub deal_size: f64,
    pub sales_cycle: f64,
    pub retention: f64,
    pub gross_margin: f64,
    pub expansion: f64,
    pub arr: f64,
    pub nps: f64,
    pub churn: f64,
    pub cltv: f64,
}

impl UpliftTable {
    pub const fn standard() -> Self {
        Self {
            win_rate: 0.35,
            deal_size: 0.15,
            sales_cycle: -0.25,
            retention: 0.12,
            gross_margin: 0.05,
            expansion: 0.25,
            arr: 0.10,
            nps: 0.30,
            churn: -0.25,
            cltv: 0.15,
        }
    }

    pub const fn conservative() -> Self {
        Self {
            win_rate: 0.20,
            deal_size: 0.10,
            sales_cycle: -0.15,
            retention: 0.12,
            gross_margin: 0.0,
            expansion: 0.25,
            arr: 0.0,
            nps: 0.30,
            churn: -0.20,
            cltv: 0.0,
        }
    }

    /// All zero: every projection equals its input.
    pub const fn zero() -> Self {
        Self {
            win_rate: 0.0,
            deal_size: 0.0,
            sales_cycle: 0.0,
            retention: 0.0,
            gross_margin: 0.0,
            expansion: 0.0,
            arr: 0.0,
            nps: 0.0,
            churn: 0.0,
            cltv: 0.0,
        }
    }

    /// Uplift for a key; `None` for keys that are never projected.
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::WinRate => Some(self.win_rate),
            MetricKey::DealSize => Some(self.deal_size),
            MetricKey::SalesCycle => Some(self.sales_cycle),
            MetricKey::Retention => Some(self.retention),
            MetricKey::GrossMargin => Some(self.gross_margin),
            MetricKey::Expansion => Some(self.expansion),
            MetricKey::Arr => Some(self.arr),
            MetricKey::Nps => Some(self.nps),
            MetricKey::Churn => Some(self.churn),
            MetricKey::Cltv => Some(self.cltv),
            MetricKey::Pipeline
            | MetricKey::SalesReps
            | MetricKey::EaCost
            | MetricKey::Revenue
            | MetricKey::GrossProfit
            | MetricKey::Roi
            | MetricKey::PaybackMonths => None,
        }
    }
}

impl Default for UpliftTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Weights for cross-metric (knock-on) and benefit terms.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default, deny_unknown_fields))]
pub struct Couplings {
    /// Share of the win-rate uplift carried into the ARR multiplier.
    pub arr_from_win_rate: f64,
    /// Share of the expansion uplift carried into the ARR multiplier.
    pub arr_from_expansion: f64,
    /// Share of the retention uplift carried into the CLTV multiplier.
    pub cltv_from_retention: f64,
    pub retention_benefit: f64,
    pub arr_benefit: f64,
    pub nps_benefit: f64,
    /// Periods in the undiscounted value projection.
    pub npv_periods: f64,
}

impl Default for Couplings {
    fn default() -> Self {
        Self {
            arr_from_win_rate: 0.5,
            arr_from_expansion: 0.3,
            cltv_from_retention: 0.8,
            retention_benefit: 0.8,
            arr_benefit: 0.3,
            nps_benefit: 0.1,
            npv_periods: 3.0,
        }
    }
}

/// Bounds applied to projected values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default, deny_unknown_fields))]
pub struct Clamps {
    pub retention_cap: f64,
    pub nps_cap: f64,
    pub gross_margin_cap: f64,
    pub churn_floor: f64,
}

impl Default for Clamps {
    fn default() -> Self {
        Self {
            retention_cap: 95.0,
            nps_cap: 80.0,
            gross_margin_cap: 90.0,
            churn_floor: 2.0,
        }
    }
}

/// Everything the engine needs besides the session state.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default, deny_unknown_fields))]
pub struct ImpactModel {
    pub uplifts: UpliftTable,
    pub couplings: Couplings,
    pub clamps: Clamps,
}

impl ImpactModel {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            uplifts: preset.uplifts(),
            ..Self::default()
        }
    }

    pub fn with_uplifts(mut self, uplifts: UpliftTable) -> Self {
        self.uplifts = uplifts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_round_trip_tokens() {
        for p in [Preset::Standard, Preset::Conservative] {
            assert_eq!(p.as_str().parse::<Preset>().unwrap(), p);
        }
        assert!("aggressive".parse::<Preset>().is_err());
    }

    #[test]
    fn reductions_are_negative_in_every_preset() {
        for p in [Preset::Standard, Preset::Conservative] {
            let u = p.uplifts();
            assert!(u.sales_cycle < 0.0);
            assert!(u.churn < 0.0);
        }
    }

    #[test]
    fn pass_through_keys_have_no_uplift() {
        let u = UpliftTable::standard();
        assert_eq!(u.get(MetricKey::Pipeline), None);
        assert_eq!(u.get(MetricKey::EaCost), None);
        assert_eq!(u.get(MetricKey::SalesReps), None);
        assert_eq!(u.get(MetricKey::WinRate), Some(0.35));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_model_overrides_keep_defaults() {
        let m: ImpactModel =
            serde_json::from_str(r#"{"uplifts":{"winRate":0.5},"clamps":{"npsCap":70}}"#).unwrap();
        assert_eq!(m.uplifts.win_rate, 0.5);
        assert_eq!(m.uplifts.deal_size, UpliftTable::standard().deal_size);
        assert_eq!(m.clamps.nps_cap, 70.0);
        assert_eq!(m.clamps.retention_cap, 95.0);
        assert_eq!(m.couplings, Couplings::default());
    }
}
