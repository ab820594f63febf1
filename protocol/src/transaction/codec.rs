//! Canonical message construction, signing, verification, and chain hashing.
//!
//! ## Canonical message
//!
//! ```text
//! digest = SHA-256( sender_hex || recipient || amount_2dp )
//! ```
//!
//! The three fields are concatenated as text with no separators, and the
//! 32-byte digest (not the raw text) is what gets signed. `amount_2dp` is
//! always exactly two decimals, so `5.1` and `5.10` sign identically.
//!
//! ## Chain hash
//!
//! ```text
//! link = hex( SHA-256( sender || recipient || amount_2dp || signature_b64 || previous_link ) )
//! ```
//!
//! Computed over the entry's full canonical fields, including its own
//! previous link, so rewriting any historical entry breaks every link after it.
//!
//! ## Malformed vs. unauthenticated
//!
//! [`verify`] returns `Err` when the inputs can't even be parsed (bad hex,
//! bad base64, wrong lengths) and `Ok(false)` when they parse but the
//! signature doesn't check out. Callers report the two differently.

use thiserror::Error;

use super::amount::Amount;
use super::types::{Transaction, TransferRequest};
use crate::config::{HASH_OUTPUT_LENGTH, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::hash::{sha256_concat, sha256_hex};
use crate::crypto::keys::{Keypair, PublicKey, Signature};
use crate::error::ErrorKind;

/// Malformed transfer input. Raised before any cryptographic work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid sender public key (not hex)")]
    SenderNotHex,

    #[error("invalid public key length (expected {PUBLIC_KEY_LENGTH} bytes, got {0})")]
    SenderLength(usize),

    #[error("invalid base64 signature")]
    SignatureNotBase64,

    #[error("invalid signature length (expected {SIGNATURE_LENGTH} bytes, got {0})")]
    SignatureLength(usize),

    #[error("recipient must not be empty")]
    EmptyRecipient,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("amount exceeds the ledger maximum of {}", Amount::MAX)]
    AmountOutOfRange,
}

impl CodecError {
    /// Always [`ErrorKind::MalformedInput`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}

/// SHA-256 digest of the canonical `sender || recipient || amount` text.
pub fn canonical_message(sender: &str, recipient: &str, amount: Amount) -> [u8; HASH_OUTPUT_LENGTH] {
    let amount = amount.canonical();
    sha256_concat(&[sender.as_bytes(), recipient.as_bytes(), amount.as_bytes()])
}

/// Sign a transfer with a raw 32-byte seed.
///
/// Ed25519 is deterministic: the same seed and inputs always produce the
/// same 64 bytes.
pub fn sign(seed: &[u8; SEED_LENGTH], sender: &str, recipient: &str, amount: Amount) -> Signature {
    sign_with(&Keypair::from_seed(seed), sender, recipient, amount)
}

/// Sign a transfer with an already-loaded keypair.
pub fn sign_with(keypair: &Keypair, sender: &str, recipient: &str, amount: Amount) -> Signature {
    keypair.sign(&canonical_message(sender, recipient, amount))
}

/// Parse the sender's hex public key, distinguishing "not hex" from "wrong length".
pub fn decode_sender(sender: &str) -> Result<PublicKey, CodecError> {
    let bytes = hex::decode(sender).map_err(|_| CodecError::SenderNotHex)?;
    let bytes = <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice())
        .map_err(|_| CodecError::SenderLength(bytes.len()))?;
    Ok(PublicKey::from_bytes(bytes))
}

/// Parse a base64 signature, distinguishing "not base64" from "wrong length".
pub fn decode_signature(signature: &str) -> Result<Signature, CodecError> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let bytes = BASE64
        .decode(signature)
        .map_err(|_| CodecError::SignatureNotBase64)?;
    let bytes = <[u8; SIGNATURE_LENGTH]>::try_from(bytes.as_slice())
        .map_err(|_| CodecError::SignatureLength(bytes.len()))?;
    Ok(Signature::from_bytes(bytes))
}

/// Verify a transfer signature.
///
/// `Err` for malformed input, `Ok(false)` for a well-formed signature that
/// doesn't verify (including a sender key that isn't a valid curve point).
pub fn verify(sender: &str, recipient: &str, amount: Amount, signature: &str) -> Result<bool, CodecError> {
    let public_key = decode_sender(sender)?;
    let signature = decode_signature(signature)?;
    let digest = canonical_message(sender, recipient, amount);
    Ok(public_key.verify(&digest, &signature))
}

/// Structural checks a transfer must pass before its signature is even looked at.
pub fn validate_request(request: &TransferRequest) -> Result<(), CodecError> {
    if request.recipient.is_empty() {
        return Err(CodecError::EmptyRecipient);
    }
    if request.amount.is_zero() {
        return Err(CodecError::ZeroAmount);
    }
    if request.amount > Amount::MAX {
        return Err(CodecError::AmountOutOfRange);
    }
    Ok(())
}

/// Validate and verify a submitted transfer in one go.
pub fn verify_request(request: &TransferRequest) -> Result<bool, CodecError> {
    validate_request(request)?;
    verify(
        &request.sender,
        &request.recipient,
        request.amount,
        &request.signature,
    )
}

/// Hex SHA-256 over an entry's canonical fields. The entry's identity, and
/// the `previous_link` of whatever comes after it.
pub fn chain_hash(tx: &Transaction) -> String {
    let amount = tx.amount.canonical();
    let mut preimage = String::with_capacity(
        tx.sender.len() + tx.recipient.len() + amount.len() + tx.signature.len() + tx.previous_link.len(),
    );
    preimage.push_str(&tx.sender);
    preimage.push_str(&tx.recipient);
    preimage.push_str(&amount);
    preimage.push_str(&tx.signature);
    preimage.push_str(&tx.previous_link);
    sha256_hex(preimage.as_bytes())
}
