//! Core transaction records.
//!
//! String fields hold exactly what the submitter sent. The canonical message
//! and the chain hash are computed over those strings, so normalizing them
//! (lowercasing hex, re-encoding base64) would change hashes out from under
//! clients that computed them independently.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use crate::config::GENESIS_ADDRESS;

/// A signed value transfer as submitted by a client.
///
/// This is the interchange format the wallet CLI prints and the service
/// accepts: `{sender, recipient, amount, signature}`. Clients never supply
/// a previous link; the ledger fills that in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Hex-encoded 32-byte Ed25519 public key.
    pub sender: String,
    /// Hex public key or free-form address string.
    pub recipient: String,
    /// Transfer amount.
    pub amount: Amount,
    /// Base64-encoded 64-byte Ed25519 signature over the canonical digest.
    pub signature: String,
}

/// An entry in the hash chain.
///
/// Once appended, an entry is never modified. `previous_link` is the hex
/// SHA-256 chain hash of the entry before it, and empty only for genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Amount,
    pub signature: String,
    /// Serialized as `previous_block`, the key existing block explorers read.
    #[serde(rename = "previous_block", alias = "previous_link", default)]
    pub previous_link: String,
}

impl Transaction {
    /// The fixed first entry of every chain.
    pub fn genesis() -> Self {
        Self {
            sender: GENESIS_ADDRESS.to_string(),
            recipient: GENESIS_ADDRESS.to_string(),
            amount: Amount::ZERO,
            signature: String::new(),
            previous_link: String::new(),
        }
    }

    /// Returns `true` if this is the genesis entry.
    pub fn is_genesis(&self) -> bool {
        self.previous_link.is_empty()
            && self.sender == GENESIS_ADDRESS
            && self.recipient == GENESIS_ADDRESS
            && self.signature.is_empty()
    }

    /// Promotes a verified request into a chain entry linked to `previous_link`.
    pub fn from_request(request: TransferRequest, previous_link: String) -> Self {
        Self {
            sender: request.sender,
            recipient: request.recipient,
            amount: request.amount,
            signature: request.signature,
            previous_link,
        }
    }

    /// Returns `true` if `address` sent or received this transaction.
    pub fn involves(&self, address: &str) -> bool {
        self.sender == address || self.recipient == address
    }
}
