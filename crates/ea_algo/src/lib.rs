// crates/ea_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Projection engine.
//!
//! `project(inputs, enabled, model)` is a pure function: no I/O, no logging,
//! no shared state, never fails. Every division site goes through
//! [`guard::safe_div`], so zero denominators produce 0 rather than NaN/∞.

pub use ea_core::{EnabledSet, ImpactModel, InputSet, MetricKey, ProjectionResult};

// ----------------------------- Modules ---------------------------------------------------

pub mod financials;
pub mod guard;
pub mod projection;

// Convenience re-exports (pipeline imports these from crate root)
pub use financials::{net_present_value, payback_months, roi_percent, Financials};
pub use guard::{finite, safe_div};
pub use projection::{project, project_metric};
