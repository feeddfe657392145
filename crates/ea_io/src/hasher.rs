//! crates/ea_io/src/hasher.rs
//!
//! SHA-256 digests and artifact ids.
//!
//! - `PRJ:<hex64>` ids derive from canonical JSON bytes of the projection payload.
//! - Hex digests are lowercase.
//! - Use `sha256_canonical` for values/structs and `sha256_hex`/`sha256_file` for raw bytes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// SHA-256 over a file's raw bytes.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let f = File::open(path).map_err(|e| IoError::Hash(format!("{}: {e}", path.display())))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = r.read(&mut buf).map_err(|e| IoError::Hash(e.to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// `PRJ:<hex>`, id for `projection.json`.
pub fn prj_id_from_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(format!("PRJ:{}", sha256_canonical(value)?))
}

/// True for `<PREFIX>:<64 lowercase hex>`.
pub fn is_artifact_id(id: &str, prefix: &str) -> bool {
    match id.split_once(':') {
        Some((p, hex64)) => {
            p == prefix
                && hex64.len() == 64
                && hex64.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
        }
        None => false,
    }
}
