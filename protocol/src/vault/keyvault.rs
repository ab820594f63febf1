//! Password-based sealing: scrypt for the key, AES-256-GCM for the box.
//!
//! ```text
//! encrypt(plaintext, password)
//!   salt   <- OsRng (16 bytes, fresh every call)
//!   key    <- scrypt(password, salt, N=2^15, r=8, p=1) -> 32 bytes
//!   sealed <- nonce || AES-256-GCM(key, nonce, plaintext)
//!   return (sealed, salt)
//! ```
//!
//! `KeyVault` holds no state beyond its cost parameters. Calls are
//! independent and need no locking.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{AES_KEY_LENGTH, SALT_LENGTH};
use crate::crypto::encryption::{self, EncryptionError};
use crate::crypto::kdf::{self, KdfError, KdfParams};
use crate::error::ErrorKind;

/// Vault failures.
///
/// Wrong password, wrong salt, and a tampered ciphertext all surface as
/// the same [`VaultError::AuthenticationFailed`].
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("authentication failed: wrong password or corrupted vault")]
    AuthenticationFailed,

    #[error("malformed vault: {0}")]
    Malformed(String),

    #[error("operating system randomness source unavailable")]
    RandomnessUnavailable,

    #[error("key derivation failed: {0}")]
    KeyDerivation(#[from] KdfError),
}

impl VaultError {
    /// Maps this error onto the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailure,
            Self::RandomnessUnavailable => ErrorKind::RandomnessUnavailable,
            Self::Malformed(_) | Self::KeyDerivation(_) => ErrorKind::MalformedInput,
        }
    }
}

impl From<EncryptionError> for VaultError {
    fn from(e: EncryptionError) -> Self {
        match e {
            EncryptionError::DecryptFailed => Self::AuthenticationFailed,
            EncryptionError::RandomnessUnavailable => Self::RandomnessUnavailable,
            EncryptionError::CiphertextTooShort => Self::Malformed(e.to_string()),
            EncryptionError::EncryptFailed => Self::Malformed(e.to_string()),
        }
    }
}

/// Output of [`KeyVault::encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    /// `nonce || ciphertext || tag`.
    pub ciphertext: Vec<u8>,
    /// The salt the key was derived under. Store it next to the ciphertext.
    pub salt: [u8; SALT_LENGTH],
}

/// Seals and opens byte strings under a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyVault {
    params: KdfParams,
}

impl KeyVault {
    /// A vault using the default scrypt cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault with custom scrypt cost. Anything persisted must use the
    /// defaults, since vault files don't record their parameters.
    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Stretch `password` into a 32-byte key under `salt`.
    pub fn derive_key(
        &self,
        password: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>, VaultError> {
        Ok(kdf::derive_key(password, salt, self.params)?)
    }

    /// Seal `plaintext` under a key derived from `password` and a fresh salt.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<SealedData, VaultError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|_| VaultError::RandomnessUnavailable)?;

        let key = self.derive_key(password, &salt)?;
        let ciphertext = encryption::seal(&key, plaintext)?;
        Ok(SealedData { ciphertext, salt })
    }

    /// Open a blob produced by [`KeyVault::encrypt`].
    ///
    /// Returns nothing but an error unless the tag verifies.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        password: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        if salt.len() != SALT_LENGTH {
            return Err(VaultError::Malformed(format!(
                "salt must be {SALT_LENGTH} bytes, got {}",
                salt.len()
            )));
        }
        let key = self.derive_key(password, salt)?;
        let plaintext = encryption::open(&key, ciphertext)?;
        Ok(Zeroizing::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AES_NONCE_LENGTH, AES_TAG_LENGTH};

    fn fast_vault() -> KeyVault {
        KeyVault::with_params(KdfParams {
            log_n: 4,
            r: 8,
            p: 1,
        })
    }

    #[test]
    fn default_cost_is_scrypt_2_15_8_1() {
        let params = KeyVault::new().params();
        assert_eq!((params.log_n, params.r, params.p), (15, 8, 1));
    }

    #[test]
    fn encrypt_then_decrypt() {
        let vault = fast_vault();
        let sealed = vault.encrypt(b"seed bytes", "hunter2").unwrap();
        assert_eq!(
            sealed.ciphertext.len(),
            AES_NONCE_LENGTH + b"seed bytes".len() + AES_TAG_LENGTH
        );
        let opened = vault
            .decrypt(&sealed.ciphertext, "hunter2", &sealed.salt)
            .unwrap();
        assert_eq!(opened.as_slice(), b"seed bytes");
    }

    #[test]
    fn every_call_draws_fresh_salt_and_nonce() {
        let vault = fast_vault();
        let a = vault.encrypt(b"same", "pw").unwrap();
        let b = vault.encrypt(b"same", "pw").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.ciphertext[..AES_NONCE_LENGTH], b.ciphertext[..AES_NONCE_LENGTH]);
    }

    #[test]
    fn wrong_password_is_an_authentication_failure() {
        let vault = fast_vault();
        let sealed = vault.encrypt(b"secret", "right").unwrap();
        let err = vault
            .decrypt(&sealed.ciphertext, "wrong", &sealed.salt)
            .unwrap_err();
        assert!(matches!(err, VaultError::AuthenticationFailed));
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn wrong_salt_is_an_authentication_failure() {
        let vault = fast_vault();
        let sealed = vault.encrypt(b"secret", "pw").unwrap();
        let mut salt = sealed.salt;
        salt[0] ^= 1;
        assert!(matches!(
            vault.decrypt(&sealed.ciphertext, "pw", &salt),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn any_bit_flip_is_an_authentication_failure() {
        let vault = fast_vault();
        let sealed = vault.encrypt(b"secret", "pw").unwrap();
        for i in 0..sealed.ciphertext.len() {
            let mut tampered = sealed.ciphertext.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(
                    vault.decrypt(&tampered, "pw", &sealed.salt),
                    Err(VaultError::AuthenticationFailed)
                ),
                "flip at byte {i} went undetected"
            );
        }
    }

    #[test]
    fn short_blob_and_bad_salt_are_malformed() {
        let vault = fast_vault();
        let salt = [0u8; SALT_LENGTH];
        assert_eq!(
            vault.decrypt(&[0u8; 10], "pw", &salt).unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            vault.decrypt(&[0u8; 40], "pw", &[0u8; 8]).unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn invalid_cost_parameters_are_reported() {
        let vault = KeyVault::with_params(KdfParams {
            log_n: 15,
            r: 0,
            p: 1,
        });
        assert!(matches!(
            vault.encrypt(b"x", "pw"),
            Err(VaultError::KeyDerivation(_))
        ));
    }
}
