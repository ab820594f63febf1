//! # Prometheus Metrics
//!
//! Operational metrics for the ledger service, scraped at `/metrics` on
//! the metrics port.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] with the
//! `ledgerline` prefix.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the service.
#[derive(Clone)]
pub struct NodeMetrics {
    registry: Registry,
    /// Transfers accepted into the chain.
    pub transactions_accepted_total: IntCounter,
    /// Transfers rejected, labelled by error kind.
    pub transactions_rejected_total: IntCounterVec,
    /// Faucet credits granted.
    pub airdrops_total: IntCounter,
    /// Chain entries, genesis included.
    pub chain_length: IntGauge,
    /// Time spent inside `submit`, verification included.
    pub submit_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("ledgerline".into()), None)?;

        let transactions_accepted_total = IntCounter::new(
            "transactions_accepted_total",
            "Total number of transfers accepted into the chain",
        )?;
        registry.register(Box::new(transactions_accepted_total.clone()))?;

        let transactions_rejected_total = IntCounterVec::new(
            Opts::new(
                "transactions_rejected_total",
                "Total number of transfers rejected, by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(transactions_rejected_total.clone()))?;

        let airdrops_total =
            IntCounter::new("airdrops_total", "Total number of faucet credits granted")?;
        registry.register(Box::new(airdrops_total.clone()))?;

        let chain_length = IntGauge::new("chain_length", "Entries in the transaction chain")?;
        registry.register(Box::new(chain_length.clone()))?;

        let submit_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "submit_latency_seconds",
                "Transfer submission latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
            ]),
        )?;
        registry.register(Box::new(submit_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            transactions_accepted_total,
            transactions_rejected_total,
            airdrops_total,
            chain_length,
            submit_latency_seconds,
        })
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
