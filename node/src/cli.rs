//! # CLI Interface
//!
//! Defines the command-line argument structure for `ledgerline-node` using
//! `clap` derive. Every `run` flag can also come from a `LEDGERLINE_*`
//! environment variable.

use clap::{Parser, Subcommand};
use std::net::IpAddr;

use ledgerline_protocol::config::{DEFAULT_API_PORT, DEFAULT_FAUCET_GRANT, DEFAULT_METRICS_PORT};
use ledgerline_protocol::transaction::Amount;

use crate::logging::LogFormat;

/// Ledgerline ledger service.
///
/// Accepts signed transfers over HTTP, keeps balances and the hash-linked
/// transaction history in memory, and exposes Prometheus metrics.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerline-node",
    about = "Ledgerline ledger service",
    version,
    propagate_version = true
)]
pub struct LedgerlineNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ledger service.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Address both listeners bind to.
    #[arg(long, env = "LEDGERLINE_LISTEN_ADDR", default_value = "0.0.0.0")]
    pub listen_addr: IpAddr,

    /// Port for the REST API.
    #[arg(long, env = "LEDGERLINE_PORT", default_value_t = DEFAULT_API_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "LEDGERLINE_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Coins credited per `/airdrop` call, e.g. `100` or `2.50`.
    #[arg(
        long,
        env = "LEDGERLINE_FAUCET_GRANT",
        default_value_t = Amount::from_minor_units(DEFAULT_FAUCET_GRANT)
    )]
    pub faucet_grant: Amount,

    /// Log output format.
    #[arg(long, env = "LEDGERLINE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
