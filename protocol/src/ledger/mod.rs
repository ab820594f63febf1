//! # Ledger Module
//!
//! Balances plus the hash chain, and the one state machine allowed to
//! change them.
//!
//! ```text
//! chain.rs  — Append-only chain: genesis, linking, integrity audit
//! state.rs  — BalanceSheet: per-account balances, all-or-nothing transfers
//! engine.rs — Ledger: verify → solvency → mutate → link, under one lock
//! ```
//!
//! ## Data flow
//!
//! ```text
//! TransferRequest ─verify─▶ Ledger::submit ─▶ BalanceSheet::transfer
//!                                         └─▶ Chain::link ─▶ Receipt
//! ```
//!
//! State lives only for the life of the process.

pub mod chain;
pub mod engine;
pub mod state;

pub use chain::{Chain, ChainError};
pub use engine::{AddressHistory, Ledger, LedgerSummary, Receipt, Rejection};
pub use state::{BalanceError, BalanceSheet};
