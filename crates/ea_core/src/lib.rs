//! ea_core: core types shared by the EA impact engine.
//!
//! This crate is **I/O-free**. It defines the stable types used across the
//! workspace (`ea_algo`, `ea_io`, `ea_pipeline`, `ea_report`, `ea_cli`).
//!
//! - Closed metric key set: `MetricKey` (inputs + derived keys)
//! - Static descriptor catalog: label, unit kind, display color
//! - Session state: `InputSet` (numbers) and `EnabledSet` (flags)
//! - Impact model: uplift table, coupling weights, clamps, named presets
//! - Projection output: enum-indexed `MetricMap` and `ProjectionResult`
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for key parsing and field overrides.
    #[derive(Clone, Debug, PartialEq)]
    pub enum CoreError {
        UnknownMetric(String),
        NotAnInput(&'static str),
        UnknownPreset(String),
        BadOverride(String),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::UnknownMetric(k) => write!(f, "unknown metric: {k}"),
                CoreError::NotAnInput(k) => write!(f, "metric is derived, not an input: {k}"),
                CoreError::UnknownPreset(p) => write!(f, "unknown preset: {p}"),
                CoreError::BadOverride(s) => write!(f, "invalid override (expected key=value): {s}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod inputs;
pub mod metrics;
pub mod results;
pub mod variables;

pub use errors::CoreError;
pub use inputs::{EnabledSet, InputSet};
pub use metrics::{MetricCatalog, MetricDescriptor, MetricKey, UnitKind};
pub use results::{MetricMap, MetricRow, ProjectionResult, WinCount};
pub use variables::{Clamps, Couplings, ImpactModel, Preset, UpliftTable};
