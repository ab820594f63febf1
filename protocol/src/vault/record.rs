//! The on-disk vault file.
//!
//! ```json
//! {
//!   "wallet": "alice",
//!   "salt":   "<32 hex chars>",
//!   "data":   "<base64 of nonce || AES-GCM(WalletSecrets JSON)>"
//! }
//! ```
//!
//! Only `data` is secret. The name is stored in the clear so a file can be
//! identified without the password.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::keyvault::{KeyVault, VaultError};
use crate::wallet::{Wallet, WalletSecrets};

/// A password-sealed wallet, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub wallet: String,
    pub salt: String,
    pub data: String,
}

impl VaultRecord {
    /// Seal `wallet` under `password`.
    pub fn lock(wallet: &Wallet, password: &str, vault: &KeyVault) -> Result<Self, VaultError> {
        let plaintext = zeroize::Zeroizing::new(
            serde_json::to_vec(&wallet.secrets())
                .map_err(|e| VaultError::Malformed(e.to_string()))?,
        );
        let sealed = vault.encrypt(&plaintext, password)?;

        tracing::debug!(wallet = wallet.name(), "sealed wallet");
        Ok(Self {
            wallet: wallet.name().to_string(),
            salt: hex::encode(sealed.salt),
            data: BASE64.encode(&sealed.ciphertext),
        })
    }

    /// Unseal with `password` and rebuild the wallet.
    pub fn unlock(&self, password: &str, vault: &KeyVault) -> Result<Wallet, VaultError> {
        let salt = hex::decode(&self.salt)
            .map_err(|_| VaultError::Malformed("salt is not valid hex".into()))?;
        let ciphertext = BASE64
            .decode(&self.data)
            .map_err(|_| VaultError::Malformed("data is not valid base64".into()))?;

        let plaintext = vault.decrypt(&ciphertext, password, &salt)?;
        let secrets: WalletSecrets = serde_json::from_slice(&plaintext)
            .map_err(|_| VaultError::Malformed("decrypted wallet is not valid JSON".into()))?;
        Wallet::from_secrets(&secrets).map_err(|e| VaultError::Malformed(e.to_string()))
    }

    /// Pretty JSON, as written to disk.
    pub fn to_json(&self) -> Result<String, VaultError> {
        serde_json::to_string_pretty(self).map_err(|e| VaultError::Malformed(e.to_string()))
    }

    /// Parse a vault file's contents.
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        serde_json::from_str(json).map_err(|e| VaultError::Malformed(e.to_string()))
    }
}
