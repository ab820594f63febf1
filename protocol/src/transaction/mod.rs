//! # Transaction Module
//!
//! Everything about a single transfer: how its amount is represented, what
//! the record looks like on the wire and in the chain, and how it is
//! signed, verified, and hashed.
//!
//! ```text
//! amount.rs — Fixed-point two-decimal Amount (integer cents)
//! types.rs  — TransferRequest (client wire form) and Transaction (chain entry)
//! codec.rs  — Canonical message, sign, verify, chain hash
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Sign** — a [`Wallet`](crate::wallet::Wallet) builds a [`TransferRequest`]
//!    and signs the canonical digest.
//! 2. **Submit** — the request goes to [`Ledger::submit`](crate::ledger::Ledger::submit).
//! 3. **Verify** — [`codec::verify_request`] parses and checks the signature.
//! 4. **Link** — once accepted, the ledger stamps the previous link and the
//!    request becomes an immutable [`Transaction`] in the chain.

pub mod amount;
pub mod codec;
pub mod types;

pub use amount::{Amount, AmountError};
pub use codec::{canonical_message, chain_hash, sign, sign_with, verify, verify_request, CodecError};
pub use types::{Transaction, TransferRequest};
