//! Projection output types.
//!
//! `MetricMap` is a fixed array indexed by `MetricKey`; an absent slot means
//! the metric was not computed (disabled, or its prerequisites were off).

#[cfg(feature = "serde")]
use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

use crate::metrics::MetricKey;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct MetricMap {
    slots: [Option<f64>; MetricKey::COUNT],
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        self.slots[key.index()]
    }

    #[inline]
    pub fn set(&mut self, key: MetricKey, value: f64) {
        self.slots[key.index()] = Some(value);
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.slots[key.index()].is_some()
    }

    /// Present entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        MetricKey::ALL
            .iter()
            .filter_map(move |k| self.get(*k).map(|v| (*k, v)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "serde")]
impl Serialize for MetricMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            m.serialize_entry(k.as_str(), &v)?;
        }
        m.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for MetricMap {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = std::collections::BTreeMap::<MetricKey, f64>::deserialize(d)?;
        let mut out = MetricMap::new();
        for (k, v) in raw {
            out.set(k, v);
        }
        Ok(out)
    }
}

/// Derived deal counts (revenue / deal size). Only produced when the divisor is non-zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WinCount {
    pub current: f64,
    pub projected: f64,
}

/// One metric's before/after view.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricRow {
    pub key: MetricKey,
    pub current: f64,
    pub projected: f64,
    pub improvement: f64,
}

/// Fresh engine output; never merged with a previous result.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProjectionResult {
    pub current: MetricMap,
    pub projected: MetricMap,
    pub improvement: MetricMap,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub wins: Option<WinCount>,
    /// Revenue uplift attributed to win rate, deal size and sales cycle.
    pub revenue_gains: f64,
    pub total_annual_benefit: f64,
    /// Investment denominator (the eaCost input, enabled or not).
    pub investment_cost: f64,
    /// Percent.
    pub roi: f64,
    pub payback_months: f64,
    pub net_present_value: f64,
}

impl ProjectionResult {
    pub fn row(&self, key: MetricKey) -> Option<MetricRow> {
        Some(MetricRow {
            key,
            current: self.current.get(key)?,
            projected: self.projected.get(key)?,
            improvement: self.improvement.get(key).unwrap_or(0.0),
        })
    }

    /// Improvement with absent metrics reading as zero.
    pub fn improvement_of(&self, key: MetricKey) -> f64 {
        self.improvement.get(key).unwrap_or(0.0)
    }

    /// Keys with both a current and projected value, in key order.
    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        MetricKey::ALL
            .into_iter()
            .filter(move |k| self.current.contains(*k) && self.projected.contains(*k))
    }

    /// Sign-normalized percent change (positive = better); 0 when current is 0.
    pub fn percent_improvement(&self, key: MetricKey) -> Option<f64> {
        let row = self.row(key)?;
        if row.current == 0.0 {
            return Some(0.0);
        }
        let pct = row.improvement / row.current.abs() * 100.0;
        Some(if pct.is_finite() { pct } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_tracks_presence() {
        let mut m = MetricMap::new();
        assert!(m.is_empty());
        m.set(MetricKey::Arr, 10.0);
        m.set(MetricKey::Pipeline, 5.0);
        assert_eq!(m.len(), 2);
        let keys: Vec<_> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![MetricKey::Pipeline, MetricKey::Arr]);
    }

    #[test]
    fn percent_improvement_guards_zero_current() {
        let mut r = ProjectionResult::default();
        r.current.set(MetricKey::Nps, 0.0);
        r.projected.set(MetricKey::Nps, 0.0);
        r.improvement.set(MetricKey::Nps, 0.0);
        assert_eq!(r.percent_improvement(MetricKey::Nps), Some(0.0));
        assert_eq!(r.percent_improvement(MetricKey::Arr), None);

        r.current.set(MetricKey::SalesCycle, 6.0);
        r.projected.set(MetricKey::SalesCycle, 4.5);
        r.improvement.set(MetricKey::SalesCycle, 1.5);
        assert_eq!(r.percent_improvement(MetricKey::SalesCycle), Some(25.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn map_serializes_as_token_object() {
        let mut m = MetricMap::new();
        m.set(MetricKey::WinRate, 27.0);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v, serde_json::json!({"winRate": 27.0}));
        let back: MetricMap = serde_json::from_value(v).unwrap();
        assert_eq!(back, m);
    }
}
