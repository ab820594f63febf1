// Copyright (c) 2026 Ledgerline Contributors. MIT License.
// See LICENSE for details.

//! # Ledgerline Protocol — Core Library
//!
//! A small, honest value ledger: accounts are Ed25519 public keys, every
//! transfer is signed over a canonical digest, and every accepted transfer
//! is hash-linked to the one before it so history can be audited end to end.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256, Ed25519 keys, scrypt, AES-256-GCM.
//! - **transaction** — Amounts, the wire records, and the signature codec.
//! - **ledger** — Balances plus the hash chain, mutated under one lock.
//! - **vault** — Password-sealed wallet files.
//! - **wallet** — A named keypair that signs transfers.
//! - **error** — The closed error taxonomy every module maps onto.
//! - **config** — Protocol constants.
//!
//! ## Data flow
//!
//! ```text
//! Wallet::sign_transfer ─▶ TransferRequest ─▶ Ledger::submit ─▶ Receipt
//!        ▲                                         │
//!   VaultRecord::unlock                     Chain (hash-linked)
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Check everything before touching anything. A rejected transfer
//!    leaves no trace.
//! 2. Money is integer cents. Floats only exist at the JSON edge.
//! 3. Secrets are zeroized, never logged, and never in `Debug` output.

pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod vault;
pub mod wallet;

pub use error::ErrorKind;
pub use ledger::{Ledger, Receipt, Rejection};
pub use transaction::{Amount, Transaction, TransferRequest};
pub use vault::{KeyVault, VaultError, VaultRecord};
pub use wallet::{Wallet, WalletSecrets};
