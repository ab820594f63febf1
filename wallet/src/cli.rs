//! # CLI Interface
//!
//! `clap` derive definitions for `ledgerline-wallet`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ledgerline_protocol::transaction::Amount;

/// Ledgerline wallet.
///
/// Creates password-sealed wallet files and signs transfers for submission
/// to a ledgerline-node.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerline-wallet",
    about = "Ledgerline wallet",
    version,
    propagate_version = true
)]
pub struct WalletCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new keypair and seal it in a wallet file.
    Create {
        /// Display name. Spaces become underscores in the file name.
        #[arg(long)]
        name: String,

        /// Directory the wallet file is written to.
        #[arg(long, env = "LEDGERLINE_WALLET_DIR", default_value = "wallets")]
        dir: PathBuf,

        #[command(flatten)]
        password: PasswordArg,
    },

    /// Unlock a wallet file and print its public key.
    ShowPublicKey {
        /// Path to the wallet file.
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        password: PasswordArg,
    },

    /// Unlock a wallet file and print a signed transfer as JSON.
    Sign {
        /// Path to the wallet file.
        #[arg(long)]
        file: PathBuf,

        /// Recipient address.
        #[arg(long)]
        recipient: String,

        /// Amount in coins, at most two decimals, e.g. `12.5`.
        #[arg(long)]
        amount: Amount,

        #[command(flatten)]
        password: PasswordArg,
    },
}

/// Where the wallet password comes from.
#[derive(Args, Debug)]
pub struct PasswordArg {
    /// Wallet password. When omitted, one line is read from stdin.
    #[arg(long = "password", env = "LEDGERLINE_WALLET_PASSWORD", hide_env_values = true)]
    pub value: Option<String>,
}
