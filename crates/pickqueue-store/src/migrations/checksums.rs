//! Checksum validation for migrations
//!
//! SHA256 of the migration SQL, recorded in `schema_version` so an edited
//! migration is detected instead of silently skipped.

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
