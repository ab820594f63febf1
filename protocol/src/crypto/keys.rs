//! # Key Management
//!
//! Ed25519 keypairs, public keys, and signatures for Ledgerline accounts.
//!
//! An account *is* its public key: 32 bytes, shown to the world as 64
//! lowercase hex characters. The private half is only ever handled as its
//! 32-byte seed. The expanded secret key that ed25519-dalek derives
//! internally never leaves this module, so the vault only has 32 bytes
//! to protect.
//!
//! ## Security considerations
//!
//! - Signing keys are zeroized on drop (ed25519-dalek does this for us).
//! - Generation uses `OsRng`. If the OS can't hand us randomness, we
//!   report it instead of falling back to anything weaker.
//! - Key bytes are never logged.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

use crate::config::{PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use crate::error::ErrorKind;

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* key material was rejected.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid seed: expected {SEED_LENGTH} hex-encoded bytes")]
    InvalidSeed,

    #[error("invalid public key: expected {PUBLIC_KEY_LENGTH} hex-encoded bytes")]
    InvalidPublicKey,

    #[error("keypair mismatch: public key does not belong to this seed")]
    KeypairMismatch,

    #[error("operating system randomness source unavailable")]
    RandomnessUnavailable,
}

impl KeyError {
    /// Maps this error onto the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RandomnessUnavailable => ErrorKind::RandomnessUnavailable,
            _ => ErrorKind::MalformedInput,
        }
    }
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// An Ed25519 keypair backing one Ledgerline account.
///
/// `Keypair` intentionally does NOT implement `Serialize`. Exporting the
/// seed should be a deliberate act ([`Keypair::seed`]), not a side effect
/// of dropping a wallet into a JSON response.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS cryptographic RNG.
    ///
    /// Fails with [`KeyError::RandomnessUnavailable`] rather than panicking
    /// when the OS refuses to produce bytes.
    pub fn generate() -> Result<Self, KeyError> {
        let mut seed = [0u8; SEED_LENGTH];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|_| KeyError::RandomnessUnavailable)?;
        let keypair = Self::from_seed(&seed);
        seed.zeroize();
        Ok(keypair)
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a hex-encoded seed, as stored inside a vault.
    pub fn from_seed_hex(hex_str: &str) -> Result<Self, KeyError> {
        let mut bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSeed)?;
        let result = <[u8; SEED_LENGTH]>::try_from(bytes.as_slice())
            .map(|seed| Self::from_seed(&seed))
            .map_err(|_| KeyError::InvalidSeed);
        bytes.zeroize();
        result
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Exports the raw 32-byte seed.
    ///
    /// This is the only secret standing between an attacker and the account.
    /// It belongs inside a vault and nowhere else.
    pub fn seed(&self) -> [u8; SEED_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// Hex-encoded seed, for the sealed wallet JSON.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed())
    }

    /// Sign arbitrary bytes. Ed25519 signing is deterministic (RFC 8032).
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }
}

impl Clone for Keypair {
    /// Every clone is one more copy of the seed to worry about.
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even partially.
        write!(f, "Keypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for Keypair {
    /// Compared by public key. Comparing secrets in variable time is a bad habit.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of an account. Doubles as the account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Wrap raw bytes. No curve-point validation happens here; a bogus point
    /// simply never verifies anything.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a hex-encoded public key. Rejects bad hex and wrong lengths.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        let bytes =
            <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Lowercase hex representation. 64 characters; this is the address.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `false` for a wrong signature *and* for a key that isn't a
    /// valid curve point. Both mean the same thing to the caller: untrusted.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte Ed25519 signature. Travels as standard (padded) base64.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl Signature {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Standard base64 with padding. 88 characters.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}
