//! # AES-256-GCM Encryption
//!
//! Authenticated encryption for wallet secrets at rest. AEAD means one
//! operation buys both confidentiality and tamper detection; there is no
//! separate MAC to forget to check.
//!
//! ## Nonce management
//!
//! GCM is unforgiving about nonce reuse under one key. Every call to
//! [`seal`] draws a fresh 96-bit nonce from the OS CSPRNG. In practice
//! each vault key is also fresh (new salt per encryption), so a collision
//! would need two independent 128-bit and 96-bit coincidences at once.
//!
//! ## Wire format
//!
//! [`seal`] returns `nonce || ciphertext || tag` as a single `Vec<u8>`.
//! [`open`] expects exactly that layout.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, AES_TAG_LENGTH};

/// Errors that can occur during encryption/decryption.
///
/// "Wrong key" and "corrupted ciphertext" are the same error on purpose.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: must be at least {} bytes", AES_NONCE_LENGTH + AES_TAG_LENGTH)]
    CiphertextTooShort,

    #[error("operating system randomness source unavailable")]
    RandomnessUnavailable,
}

/// Encrypt plaintext with AES-256-GCM under a random nonce.
///
/// Returns `nonce || ciphertext || tag`.
///
/// # Example
///
/// ```
/// use ledgerline_protocol::crypto::encryption::{open, seal};
///
/// let key = [0x42u8; 32]; // use a derived key in real code
/// let sealed = seal(&key, b"seed material").unwrap();
/// assert_eq!(open(&key, &sealed).unwrap(), b"seed material");
/// ```
pub fn seal(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|_| EncryptionError::RandomnessUnavailable)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt data produced by [`seal`].
///
/// # Errors
///
/// [`EncryptionError::DecryptFailed`] for a wrong key, a flipped bit
/// anywhere in nonce/ciphertext/tag, or truncation past the minimum length.
/// No plaintext bytes are returned on failure; aes-gcm verifies the tag
/// before releasing anything.
pub fn open(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH + AES_TAG_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}
