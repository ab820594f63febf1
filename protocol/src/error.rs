//! # Error Taxonomy
//!
//! Each module owns its own `thiserror` enum, but every one of them collapses
//! onto the small closed set below. Callers (the HTTP layer, the wallet CLI)
//! branch on [`ErrorKind`], never on message text.

use std::fmt;

/// The closed set of failure categories in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad hex, bad base64, wrong decoded length, unparseable amount.
    /// Always raised before any cryptographic or state work happens.
    MalformedInput,
    /// Parsed fine, but untrusted: a signature that doesn't verify, or an
    /// AEAD tag mismatch on vault decryption (wrong password included).
    AuthenticationFailure,
    /// The sender can't cover the amount. An expected business outcome.
    InsufficientFunds,
    /// The ledger has no genesis entry. A programmer error.
    UninitializedLedger,
    /// The OS randomness source failed. Key generation and encryption abort.
    RandomnessUnavailable,
}

impl ErrorKind {
    /// Stable snake_case tag, suitable for logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::AuthenticationFailure => "authentication_failure",
            Self::InsufficientFunds => "insufficient_funds",
            Self::UninitializedLedger => "uninitialized_ledger",
            Self::RandomnessUnavailable => "randomness_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
