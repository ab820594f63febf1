//! # Hashing Utilities
//!
//! SHA-256, and only SHA-256. Canonical transfer messages are SHA-256
//! digests, and every chain link is a hex-encoded SHA-256 digest. Clients
//! in other languages reproduce both with nothing more exotic than their
//! standard library, which is the whole point.

use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use ledgerline_protocol::crypto::sha256;
///
/// let hash = sha256(b"ledgerline");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 over several byte slices, fed in order without separators.
///
/// Equivalent to hashing their concatenation, minus the allocation.
/// Callers are responsible for making the field boundaries unambiguous
/// (or for living with the fact that they aren't).
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA-256, lowercase hex-encoded. 64 characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
