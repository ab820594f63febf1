//! # Vault Module
//!
//! Keeps a wallet's seed safe between sessions. A low-entropy password is
//! stretched by scrypt into an AES-256 key, and the wallet secrets are
//! sealed with AES-256-GCM so that a wrong password and a tampered file are
//! detected the same way: the tag doesn't verify and no bytes come back.
//!
//! ```text
//! keyvault.rs — KeyVault: derive_key / encrypt / decrypt
//! record.rs   — VaultRecord: the {wallet, salt, data} file format
//! ```
//!
//! ## Threat model
//!
//! The vault file is assumed stolen. What stands between the thief and the
//! seed is the password and the scrypt cost; nothing in the file helps an
//! attacker test a guess faster than running scrypt once per guess.

pub mod keyvault;
pub mod record;

pub use keyvault::{KeyVault, SealedData, VaultError};
pub use record::VaultRecord;
