//! # Cryptographic Primitives
//!
//! Everything security-related in Ledgerline flows through here:
//!
//! - **Ed25519** for transfer signatures.
//! - **SHA-256** for canonical messages and chain links.
//! - **scrypt** to stretch wallet passwords into keys.
//! - **AES-256-GCM** to seal wallet seeds at rest.
//!
//! Every function is a thin, typed wrapper around an audited crate.
//! Nothing here is clever, and it should stay that way.

pub mod encryption;
pub mod hash;
pub mod kdf;
pub mod keys;

pub use encryption::{open, seal};
pub use hash::{sha256, sha256_concat, sha256_hex};
pub use kdf::{derive_key, KdfParams};
pub use keys::{KeyError, Keypair, PublicKey, Signature};
