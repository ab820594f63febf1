// Copyright (c) 2026 Ledgerline Contributors. MIT License.
// See LICENSE for details.

//! # Ledgerline Node
//!
//! Entry point for the `ledgerline-node` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the REST API and the
//! Prometheus endpoint until Ctrl+C or SIGTERM.
//!
//! - `run`     — start the ledger service
//! - `version` — print build version information
//!
//! The ledger lives in memory. Stopping the process discards it.

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use ledgerline_protocol::ledger::Ledger;

use cli::{Commands, LedgerlineNodeCli};
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = LedgerlineNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the API server and the metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(logging::DEFAULT_FILTER, args.log_format);

    tracing::info!(
        listen_addr = %args.listen_addr,
        port = args.port,
        metrics_port = args.metrics_port,
        faucet_grant = %args.faucet_grant,
        "starting ledgerline-node"
    );

    // --- Ledger ---
    let ledger = Arc::new(Ledger::new());
    let genesis_hash = ledger
        .head_hash()
        .context("ledger failed to initialize its genesis entry")?;
    tracing::info!(genesis = %genesis_hash, "ledger initialized");

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new().context("failed to register metrics")?);
    node_metrics.chain_length.set(ledger.len() as i64);

    // --- Application state ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            ledgerline_protocol::config::PROTOCOL_VERSION,
        ),
        ledger,
        metrics: Arc::clone(&node_metrics),
        faucet_grant: args.faucet_grant,
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = SocketAddr::new(args.listen_addr, args.port);
    let api_listener = tokio::net::TcpListener::bind(api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = SocketAddr::new(args.listen_addr, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router).with_graceful_shutdown(shutdown_signal()) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
    }

    tracing::info!("ledgerline-node stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("ledgerline-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol        {}", ledgerline_protocol::config::PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// If a handler can't be installed, that signal is simply never observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received, draining connections");
}
