//! # Password Key Derivation
//!
//! scrypt turns a human password plus a 16-byte salt into a 32-byte
//! AES-256 key. It is slow and memory-hungry on purpose: once a vault file
//! leaks, the KDF cost is the only thing rate-limiting an offline guesser.

use scrypt::{scrypt, Params};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{AES_KEY_LENGTH, SCRYPT_LOG_N, SCRYPT_P, SCRYPT_R};

/// Errors from the key derivation step.
#[derive(Debug, Error)]
pub enum KdfError {
    #[error("invalid scrypt parameters (log_n={log_n}, r={r}, p={p})")]
    InvalidParams { log_n: u8, r: u32, p: u32 },

    #[error("scrypt key derivation failed")]
    DerivationFailed,
}

/// scrypt cost parameters.
///
/// Defaults to N = 2^15, r = 8, p = 1. Vault files don't record their
/// parameters, so anything written to disk must use the defaults; the
/// knob exists for tests and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: SCRYPT_LOG_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
        }
    }
}

impl KdfParams {
    fn to_scrypt(self) -> Result<Params, KdfError> {
        Params::new(self.log_n, self.r, self.p, AES_KEY_LENGTH).map_err(|_| {
            KdfError::InvalidParams {
                log_n: self.log_n,
                r: self.r,
                p: self.p,
            }
        })
    }
}

/// Derive a 32-byte key from `password` and `salt`.
///
/// The key is wrapped in [`Zeroizing`] so it is wiped when the caller
/// drops it.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: KdfParams,
) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>, KdfError> {
    let scrypt_params = params.to_scrypt()?;
    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    scrypt(password.as_bytes(), salt, &scrypt_params, key.as_mut_slice())
        .map_err(|_| KdfError::DerivationFailed)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams {
            log_n: 4,
            r: 8,
            p: 1,
        }
    }

    #[test]
    fn test_default_params_match_constants() {
        let p = KdfParams::default();
        assert_eq!((p.log_n, p.r, p.p), (15, 8, 1));
    }

    #[test]
    fn test_deterministic() {
        let salt = [9u8; 16];
        let a = derive_key("hunter2", &salt, fast()).unwrap();
        let b = derive_key("hunter2", &salt, fast()).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_password_and_salt_both_matter() {
        let a = derive_key("hunter2", &[1u8; 16], fast()).unwrap();
        let b = derive_key("hunter3", &[1u8; 16], fast()).unwrap();
        let c = derive_key("hunter2", &[2u8; 16], fast()).unwrap();
        assert_ne!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn test_rfc7914_vector() {
        // RFC 7914 §12: scrypt("password", "NaCl", N=1024, r=8, p=16), first 32 bytes.
        let params = KdfParams {
            log_n: 10,
            r: 8,
            p: 16,
        };
        let key = derive_key("password", b"NaCl", params).unwrap();
        assert_eq!(
            hex::encode(*key),
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162"
        );
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = KdfParams {
            log_n: 0,
            r: 0,
            p: 0,
        };
        assert!(matches!(
            derive_key("pw", &[0u8; 16], bad),
            Err(KdfError::InvalidParams { .. })
        ));
    }
}
