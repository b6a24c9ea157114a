//! Content fingerprinting and target identifiers.
//!
//! Both digests use SHA-256. Fingerprint equality is treated as content
//! equality; the collision risk is accepted as negligible.

use sha2::{Digest, Sha256};

/// Number of hex characters kept for a target identifier.
///
/// 64 bits of the address digest: short enough to stay filename-friendly,
/// long enough that distinct targets do not collide in any realistic set.
const IDENTIFIER_LEN: usize = 16;

/// Fixed-size digest of fetched content, as lowercase hex.
pub fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Deterministic storage key for a target address.
pub fn target_identifier(address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(address.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..IDENTIFIER_LEN].to_string()
}
