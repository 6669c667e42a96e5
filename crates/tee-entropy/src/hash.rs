use serde::Serialize;
use sha2::{Digest, Sha256};
use tee_core::TeeError;

use crate::serde::to_canonical_json_bytes;

/// Hex SHA256 digest of the canonical JSON form of `value`.
///
/// Key ordering is deterministic, so equal values hash equally across runs.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, TeeError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}
