// Copyright (c) 2026 Ledgerline Contributors. MIT License.
// See LICENSE for details.

//! # Ledgerline Wallet
//!
//! Entry point for the `ledgerline-wallet` binary.
//!
//! - `create`          — generate a keypair and seal it in a wallet file
//! - `show-public-key` — unlock a wallet file and print its address
//! - `sign`            — unlock a wallet file and print a signed transfer
//!
//! Results go to stdout; logs go to stderr.

mod cli;
mod store;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

use ledgerline_protocol::vault::KeyVault;

use cli::{Commands, PasswordArg, WalletCli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = WalletCli::parse();
    let vault = KeyVault::new();

    match cli.command {
        Commands::Create {
            name,
            dir,
            password,
        } => {
            let password = resolve_password(password)?;
            let (path, wallet) = store::create(&dir, &name, &password, &vault)?;
            println!("Wallet created: {}", path.display());
            println!("Public key:     {}", wallet.address());
        }
        Commands::ShowPublicKey { file, password } => {
            let password = resolve_password(password)?;
            let wallet = store::load(&file, &password, &vault)?;
            println!("{}", wallet.address());
        }
        Commands::Sign {
            file,
            recipient,
            amount,
            password,
        } => {
            let password = resolve_password(password)?;
            let wallet = store::load(&file, &password, &vault)?;
            let request = wallet
                .sign_transfer(&recipient, amount)
                .context("cannot sign this transfer")?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

/// The flag or env var if given, otherwise one line of stdin.
fn resolve_password(arg: PasswordArg) -> Result<String> {
    let password = match arg.value {
        Some(value) => value,
        None => {
            eprint!("Password: ");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}
