//! # Wallet
//!
//! A named Ed25519 keypair that signs transfers. The private key exists
//! only as its 32-byte seed; [`WalletSecrets`] is the plaintext JSON shape
//! that the vault seals:
//!
//! ```json
//! { "name": "alice", "publicKey": "<64 hex>", "privateKey": "<64 hex seed>" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::crypto::keys::{KeyError, Keypair, PublicKey};
use crate::transaction::codec::{self, CodecError};
use crate::transaction::{Amount, TransferRequest};

/// A named signing identity.
#[derive(Clone)]
pub struct Wallet {
    name: String,
    keypair: Keypair,
}

impl Wallet {
    /// A brand new wallet with a keypair fresh from the OS RNG.
    pub fn generate(name: impl Into<String>) -> Result<Self, KeyError> {
        Ok(Self::from_keypair(name, Keypair::generate()?))
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(name: impl Into<String>, keypair: Keypair) -> Self {
        Self {
            name: name.into(),
            keypair,
        }
    }

    /// Rebuild a wallet from decrypted secrets.
    ///
    /// The stored public key must be the one the seed actually produces;
    /// a mismatch means the file was assembled by hand or corrupted.
    pub fn from_secrets(secrets: &WalletSecrets) -> Result<Self, KeyError> {
        let keypair = Keypair::from_seed_hex(&secrets.private_key)?;
        let stored = PublicKey::from_hex(&secrets.public_key)?;
        if stored != keypair.public_key() {
            return Err(KeyError::KeypairMismatch);
        }
        Ok(Self::from_keypair(secrets.name.clone(), keypair))
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The account this wallet controls.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Public key as lowercase hex, the form used as a ledger address.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Build and sign a transfer from this wallet, ready to submit.
    ///
    /// Refuses a zero amount or empty recipient up front, since the ledger
    /// would reject either one anyway.
    pub fn sign_transfer(&self, recipient: &str, amount: Amount) -> Result<TransferRequest, CodecError> {
        let sender = self.address();
        let signature = codec::sign_with(&self.keypair, &sender, recipient, amount);
        let request = TransferRequest {
            sender,
            recipient: recipient.to_string(),
            amount,
            signature: signature.to_base64(),
        };
        codec::validate_request(&request)?;
        Ok(request)
    }

    /// Export the plaintext secrets for sealing.
    pub fn secrets(&self) -> WalletSecrets {
        WalletSecrets {
            name: self.name.clone(),
            public_key: self.address(),
            private_key: self.keypair.seed_hex(),
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("public_key", &self.public_key())
            .finish()
    }
}

/// Plaintext wallet contents, as sealed inside a vault file.
///
/// The seed is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSecrets {
    pub name: String,
    pub public_key: String,
    pub private_key: String,
}

impl Drop for WalletSecrets {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for WalletSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSecrets")
            .field("name", &self.name)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::codec::verify_request;

    #[test]
    fn signed_transfer_verifies() {
        let wallet = Wallet::generate("alice").unwrap();
        let req = wallet
            .sign_transfer("bob", Amount::from_minor_units(4_000))
            .unwrap();
        assert_eq!(req.sender, wallet.address());
        assert_eq!(verify_request(&req), Ok(true));
    }

    #[test]
    fn zero_amount_is_refused() {
        let wallet = Wallet::generate("alice").unwrap();
        assert_eq!(
            wallet.sign_transfer("bob", Amount::ZERO),
            Err(CodecError::ZeroAmount)
        );
        assert_eq!(
            wallet.sign_transfer("", Amount::from_minor_units(1)),
            Err(CodecError::EmptyRecipient)
        );
        assert_eq!(
            wallet.sign_transfer("bob", Amount::from_minor_units(9_007_199_254_740_993)),
            Err(CodecError::AmountOutOfRange)
        );
    }

    #[test]
    fn largest_transfer_survives_the_wire() {
        let wallet = Wallet::generate("alice").unwrap();
        let req = wallet.sign_transfer("bob", Amount::MAX).unwrap();
        let json = serde_json::to_string(&req).unwrap();
        let back: TransferRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, Amount::MAX);
        assert_eq!(verify_request(&back), Ok(true));
    }

    #[test]
    fn secrets_rebuild_the_same_wallet() {
        let wallet = Wallet::generate("alice").unwrap();
        let restored = Wallet::from_secrets(&wallet.secrets()).unwrap();
        assert_eq!(restored.name(), "alice");
        assert_eq!(restored.public_key(), wallet.public_key());
    }

    #[test]
    fn secrets_json_uses_camel_case_keys() {
        let wallet = Wallet::generate("alice").unwrap();
        let json = serde_json::to_value(wallet.secrets()).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["publicKey"], wallet.address());
        assert_eq!(json["privateKey"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn mismatched_public_key_is_rejected() {
        let wallet = Wallet::generate("alice").unwrap();
        let other = Wallet::generate("bob").unwrap();
        let mut secrets = wallet.secrets();
        secrets.public_key = other.address();
        assert!(matches!(
            Wallet::from_secrets(&secrets),
            Err(KeyError::KeypairMismatch)
        ));
    }

    #[test]
    fn debug_output_hides_the_seed() {
        let wallet = Wallet::generate("alice").unwrap();
        let seed = wallet.secrets().private_key.clone();
        assert!(!format!("{wallet:?}").contains(&seed));
        assert!(!format!("{:?}", wallet.secrets()).contains(&seed));
    }
}
