//! Metric keys and the static descriptor catalog.
//!
//! The key set is closed: thirteen user-editable inputs plus four derived
//! keys the engine produces. Everything downstream indexes by `MetricKey`
//! rather than by string, so exhaustiveness is checked at compile time.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Closed set of metric identifiers. Declaration order is the catalog order
/// used for form fields and multi-metric charts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MetricKey {
    Pipeline,
    DealSize,
    WinRate,
    #[cfg_attr(feature = "serde", serde(alias = "teamSize"))]
    SalesReps,
    SalesCycle,
    Retention,
    GrossMargin,
    Expansion,
    Arr,
    Nps,
    EaCost,
    Churn,
    Cltv,
    // ---- derived (engine output only) ----
    Revenue,
    GrossProfit,
    Roi,
    PaybackMonths,
}

impl MetricKey {
    pub const COUNT: usize = 17;

    pub const ALL: [MetricKey; Self::COUNT] = [
        MetricKey::Pipeline,
        MetricKey::DealSize,
        MetricKey::WinRate,
        MetricKey::SalesReps,
        MetricKey::SalesCycle,
        MetricKey::Retention,
        MetricKey::GrossMargin,
        MetricKey::Expansion,
        MetricKey::Arr,
        MetricKey::Nps,
        MetricKey::EaCost,
        MetricKey::Churn,
        MetricKey::Cltv,
        MetricKey::Revenue,
        MetricKey::GrossProfit,
        MetricKey::Roi,
        MetricKey::PaybackMonths,
    ];

    /// User-editable keys, in form order.
    pub const INPUTS: [MetricKey; 13] = [
        MetricKey::Pipeline,
        MetricKey::DealSize,
        MetricKey::WinRate,
        MetricKey::SalesReps,
        MetricKey::SalesCycle,
        MetricKey::Retention,
        MetricKey::GrossMargin,
        MetricKey::Expansion,
        MetricKey::Arr,
        MetricKey::Nps,
        MetricKey::EaCost,
        MetricKey::Churn,
        MetricKey::Cltv,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire token (camelCase, matches the scenario file keys).
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Pipeline => "pipeline",
            MetricKey::DealSize => "dealSize",
            MetricKey::WinRate => "winRate",
            MetricKey::SalesReps => "salesReps",
            MetricKey::SalesCycle => "salesCycle",
            MetricKey::Retention => "retention",
            MetricKey::GrossMargin => "grossMargin",
            MetricKey::Expansion => "expansion",
            MetricKey::Arr => "arr",
            MetricKey::Nps => "nps",
            MetricKey::EaCost => "eaCost",
            MetricKey::Churn => "churn",
            MetricKey::Cltv => "cltv",
            MetricKey::Revenue => "revenue",
            MetricKey::GrossProfit => "grossProfit",
            MetricKey::Roi => "roi",
            MetricKey::PaybackMonths => "paybackMonths",
        }
    }

    pub fn is_input(self) -> bool {
        !self.is_derived()
    }

    pub fn is_derived(self) -> bool {
        matches!(
            self,
            MetricKey::Revenue | MetricKey::GrossProfit | MetricKey::Roi | MetricKey::PaybackMonths
        )
    }

    /// Metrics where a smaller projected value is the improvement.
    pub fn reduction_is_good(self) -> bool {
        matches!(self, MetricKey::SalesCycle | MetricKey::Churn)
    }

    /// Parse a wire token and require it to be an input key.
    pub fn parse_input(s: &str) -> Result<MetricKey, CoreError> {
        let k: MetricKey = s.parse()?;
        if k.is_derived() {
            return Err(CoreError::NotAnInput(k.as_str()));
        }
        Ok(k)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "teamSize" {
            return Ok(MetricKey::SalesReps);
        }
        MetricKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == t)
            .ok_or_else(|| CoreError::UnknownMetric(t.to_string()))
    }
}

/// How a metric's value is displayed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnitKind {
    Currency,
    Percentage,
    Number,
}

/// Static, immutable display metadata for one metric.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MetricDescriptor {
    pub key: MetricKey,
    pub label: &'static str,
    pub unit: UnitKind,
    /// Opaque color token (CSS hex).
    pub color: &'static str,
}

const fn d(key: MetricKey, label: &'static str, unit: UnitKind, color: &'static str) -> MetricDescriptor {
    MetricDescriptor { key, label, unit, color }
}

const STANDARD_DESCRIPTORS: [MetricDescriptor; MetricKey::COUNT] = [
    d(MetricKey::Pipeline, "Pipeline ($)", UnitKind::Currency, "#3B82F6"),
    d(MetricKey::DealSize, "Average Deal Size ($)", UnitKind::Currency, "#10B981"),
    d(MetricKey::WinRate, "Current Win Rate (%)", UnitKind::Percentage, "#F59E0B"),
    d(MetricKey::SalesReps, "Number of Sales Reps", UnitKind::Number, "#8B5CF6"),
    d(MetricKey::SalesCycle, "Average Sales Cycle (months)", UnitKind::Number, "#EF4444"),
    d(MetricKey::Retention, "Customer Retention Rate (%)", UnitKind::Percentage, "#06B6D4"),
    d(MetricKey::GrossMargin, "Gross Margin (%)", UnitKind::Percentage, "#84CC16"),
    d(MetricKey::Expansion, "Expansion/Upsell Rate (%)", UnitKind::Percentage, "#F97316"),
    d(MetricKey::Arr, "Annual Recurring Revenue ($)", UnitKind::Currency, "#EC4899"),
    d(MetricKey::Nps, "Net Promoter Score", UnitKind::Number, "#6366F1"),
    d(MetricKey::EaCost, "Cost of EA Investment ($)", UnitKind::Currency, "#64748B"),
    d(MetricKey::Churn, "Churn Rate (%)", UnitKind::Percentage, "#DC2626"),
    d(MetricKey::Cltv, "Customer Lifetime Value ($)", UnitKind::Currency, "#059669"),
    d(MetricKey::Revenue, "Revenue ($)", UnitKind::Currency, "#3B82F6"),
    d(MetricKey::GrossProfit, "Gross Profit ($)", UnitKind::Currency, "#84CC16"),
    d(MetricKey::Roi, "Return on Investment (%)", UnitKind::Percentage, "#7C3AED"),
    d(MetricKey::PaybackMonths, "Payback Period (months)", UnitKind::Number, "#0EA5E9"),
];

/// Descriptor table, one entry per key, constructed once and passed by reference.
#[derive(Clone, Debug)]
pub struct MetricCatalog {
    entries: [MetricDescriptor; MetricKey::COUNT],
}

impl MetricCatalog {
    pub fn standard() -> Self {
        Self { entries: STANDARD_DESCRIPTORS }
    }

    #[inline]
    pub fn get(&self, key: MetricKey) -> &MetricDescriptor {
        &self.entries[key.index()]
    }

    pub fn label(&self, key: MetricKey) -> &'static str {
        self.get(key).label
    }

    pub fn unit(&self, key: MetricKey) -> UnitKind {
        self.get(key).unit
    }

    pub fn color(&self, key: MetricKey) -> &'static str {
        self.get(key).color
    }

    /// Input descriptors in form order (derived keys excluded).
    pub fn inputs(&self) -> impl Iterator<Item = &MetricDescriptor> + '_ {
        MetricKey::INPUTS.iter().map(move |k| self.get(*k))
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, k) in MetricKey::ALL.iter().enumerate() {
            assert_eq!(k.index(), i, "{k} out of place");
        }
    }

    #[test]
    fn catalog_entries_line_up_with_keys() {
        let cat = MetricCatalog::standard();
        for k in MetricKey::ALL {
            assert_eq!(cat.get(k).key, k);
        }
        assert_eq!(cat.inputs().count(), 13);
    }

    #[test]
    fn parse_tokens_and_alias() {
        assert_eq!("winRate".parse::<MetricKey>().unwrap(), MetricKey::WinRate);
        assert_eq!("teamSize".parse::<MetricKey>().unwrap(), MetricKey::SalesReps);
        assert!("win_rate".parse::<MetricKey>().is_err());
        assert_eq!(
            MetricKey::parse_input("revenue"),
            Err(CoreError::NotAnInput("revenue"))
        );
    }

    #[test]
    fn reduction_metrics() {
        let reds: Vec<_> = MetricKey::ALL.iter().filter(|k| k.reduction_is_good()).collect();
        assert_eq!(reds, vec![&MetricKey::SalesCycle, &MetricKey::Churn]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_wire_tokens() {
        let s = serde_json::to_string(&MetricKey::PaybackMonths).unwrap();
        assert_eq!(s, "\"paybackMonths\"");
        let k: MetricKey = serde_json::from_str("\"teamSize\"").unwrap();
        assert_eq!(k, MetricKey::SalesReps);
    }
}
