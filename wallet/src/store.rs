//! Wallet files on disk.
//!
//! A wallet file is a pretty-printed [`VaultRecord`]. Files are created
//! with mode `0600` on Unix and never overwritten.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ledgerline_protocol::vault::{KeyVault, VaultRecord};
use ledgerline_protocol::wallet::Wallet;

/// `<dir>/<name with spaces replaced by underscores>.json`.
pub fn wallet_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        bail!("wallet name must not be empty");
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        bail!("wallet name must not contain path separators: {name:?}");
    }
    Ok(dir.join(format!("{}.json", name.replace(' ', "_"))))
}

/// Generate a wallet, seal it under `password`, and write it into `dir`.
pub fn create(dir: &Path, name: &str, password: &str, vault: &KeyVault) -> Result<(PathBuf, Wallet)> {
    let path = wallet_path(dir, name)?;
    let wallet = Wallet::generate(name.trim()).context("failed to generate keypair")?;
    let json = VaultRecord::lock(&wallet, password, vault)
        .context("failed to seal wallet")?
        .to_json()?;

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create wallet directory {}", dir.display()))?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&path)
        .with_context(|| format!("failed to create {} (does it already exist?)", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), public_key = %wallet.address(), "wallet created");
    Ok((path, wallet))
}

/// Read and unlock the wallet at `path`.
pub fn load(path: &Path, password: &str, vault: &KeyVault) -> Result<Wallet> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read wallet file {}", path.display()))?;
    let record = VaultRecord::from_json(&json)
        .with_context(|| format!("{} is not a wallet file", path.display()))?;
    let wallet = record
        .unlock(password, vault)
        .with_context(|| format!("failed to unlock {}", path.display()))?;

    tracing::debug!(wallet = wallet.name(), "wallet unlocked");
    Ok(wallet)
}
