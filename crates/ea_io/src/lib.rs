//! crates/ea_io/src/lib.rs
//! I/O surface for the EA impact engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Scenario files: load, coerce, and resolve into core session state.
//! - Canonical JSON bytes + atomic writes; SHA-256 ids over canonical bytes.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for ea_io (scenario/canonical_json/hasher).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON shape errors with a JSON Pointer to the offending value.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Unknown keys, derived keys, bad preset names.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; report root.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<ea_core::CoreError> for IoError {
    fn from(e: ea_core::CoreError) -> Self {
        IoError::Invalid(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod scenario;

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{prj_id_from_canonical, sha256_hex};
    pub use crate::scenario::{load_scenario, parse_scenario_str, Scenario};
}
