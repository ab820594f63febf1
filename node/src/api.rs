//! # REST API
//!
//! Builds the axum router that exposes the ledger over HTTP. All endpoints
//! share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                      | Description                          |
//! |--------|---------------------------|--------------------------------------|
//! | GET    | `/health`                 | Liveness probe                       |
//! | GET    | `/status`                 | Ledger summary                       |
//! | POST   | `/transaction`            | Submit a signed transfer             |
//! | GET    | `/balance/:address`       | Balance of one address               |
//! | GET    | `/transactions`           | Full chain, genesis first            |
//! | GET    | `/transactions/:address`  | Chain entries touching one address   |
//! | POST   | `/airdrop`                | Faucet credit, no signature required |
//! | GET    | `/chain/verify`           | Audit every link                     |
//!
//! Handlers call into the ledger synchronously. Its critical sections are
//! short and no lock guard is ever held across an `.await`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledgerline_protocol::config::MINOR_UNITS_PER_COIN;
use ledgerline_protocol::ledger::{Ledger, Rejection};
use ledgerline_protocol::transaction::{Amount, Transaction, TransferRequest};
use ledgerline_protocol::ErrorKind;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone: everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The service's reported version string.
    pub version: String,
    /// The one ledger this process serves.
    pub ledger: Arc<Ledger>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
    /// Amount credited per `/airdrop` call.
    pub faucet_grant: Amount,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/transaction", post(transaction_handler))
        .route("/balance/:address", get(balance_handler))
        .route("/transactions", get(all_transactions_handler))
        .route("/transactions/:address", get(address_transactions_handler))
        .route("/airdrop", post(airdrop_handler))
        .route("/chain/verify", get(verify_chain_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub chain_length: usize,
    pub head_hash: String,
    pub accounts: usize,
    pub total_supply: Amount,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
}

/// Response payload for an accepted `POST /transaction`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub hash: String,
    pub previous_block: String,
}

/// Response payload for `GET /balance/:address`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: Amount,
}

/// Response payload for `GET /transactions/:address`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddressTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Request body for `POST /airdrop`.
#[derive(Debug, Deserialize)]
pub struct AirdropRequest {
    #[serde(default)]
    pub address: String,
}

/// Response payload for `POST /airdrop`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AirdropResponse {
    pub message: String,
    pub address: String,
    pub balance: Amount,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error on its way to becoming a `{"error": ...}` response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn invalid_json(rejection: JsonRejection) -> Self {
        tracing::debug!(%rejection, "unparseable request body");
        Self::bad_request("Invalid JSON")
    }
}

/// HTTP status for each error kind.
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MalformedInput | ErrorKind::InsufficientFunds => StatusCode::BAD_REQUEST,
        ErrorKind::AuthenticationFailure => StatusCode::UNAUTHORIZED,
        ErrorKind::UninitializedLedger | ErrorKind::RandomnessUnavailable => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        let status = match &rejection {
            // A broken chain is our problem, not the caller's.
            Rejection::Chain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            other => status_for(other.kind()),
        };
        Self {
            status,
            message: rejection.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// `100.00` reads as "100", `2.50` as "2.50".
fn coins_label(amount: Amount) -> String {
    if amount.minor_units() % MINOR_UNITS_PER_COIN == 0 {
        (amount.minor_units() / MINOR_UNITS_PER_COIN).to_string()
    } else {
        amount.to_string()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the service is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — ledger summary.
async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let summary = state
        .ledger
        .summary()
        .map_err(|e| ApiError::from(Rejection::from(e)))?;

    Ok(Json(StatusResponse {
        version: state.version.clone(),
        chain_length: summary.chain_length,
        head_hash: summary.head_hash,
        accounts: summary.accounts,
        total_supply: summary.total_supply,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /transaction` — verify and record a signed transfer.
async fn transaction_handler(
    State(state): State<AppState>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = body.map_err(ApiError::invalid_json)?;

    let timer = state.metrics.submit_latency_seconds.start_timer();
    let outcome = state.ledger.submit(request);
    timer.observe_duration();

    match outcome {
        Ok(receipt) => {
            state.metrics.transactions_accepted_total.inc();
            state.metrics.chain_length.set(receipt.position as i64 + 1);
            Ok(Json(SubmitResponse {
                message: "Transaction verified and recorded".into(),
                hash: receipt.hash,
                previous_block: receipt.previous_link,
            }))
        }
        Err(rejection) => {
            state
                .metrics
                .transactions_rejected_total
                .with_label_values(&[rejection.kind().as_str()])
                .inc();
            Err(rejection.into())
        }
    }
}

/// `GET /balance/:address` — zero for addresses the ledger has never seen.
async fn balance_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Json<BalanceResponse> {
    let balance = state.ledger.balance_of(&address);
    Json(BalanceResponse { address, balance })
}

/// `GET /transactions` — the whole chain.
async fn all_transactions_handler(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.ledger.history())
}

/// `GET /transactions/:address` — entries where `address` is either party.
async fn address_transactions_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Json<AddressTransactionsResponse> {
    let transactions = state
        .ledger
        .transactions_for(address)
        .iter()
        .cloned()
        .collect();
    Json(AddressTransactionsResponse { transactions })
}

/// `POST /airdrop` — credit the faucet grant without any proof.
async fn airdrop_handler(
    State(state): State<AppState>,
    body: Result<Json<AirdropRequest>, JsonRejection>,
) -> Result<Json<AirdropResponse>, ApiError> {
    let Json(AirdropRequest { address }) = body.map_err(ApiError::invalid_json)?;
    if address.is_empty() {
        return Err(ApiError::bad_request("Missing address"));
    }

    let balance = state
        .ledger
        .credit_without_proof(&address, state.faucet_grant)?;
    state.metrics.airdrops_total.inc();

    Ok(Json(AirdropResponse {
        message: format!("Airdropped {} coins", coins_label(state.faucet_grant)),
        address,
        balance,
    }))
}

/// `GET /chain/verify` — recompute every link.
async fn verify_chain_handler(State(state): State<AppState>) -> Response {
    match state.ledger.verify_chain() {
        Ok(()) => Json(serde_json::json!({
            "valid": true,
            "length": state.ledger.len(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "chain audit failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "valid": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use ledgerline_protocol::transaction::codec::chain_hash;
    use ledgerline_protocol::wallet::Wallet;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        AppState {
            version: "0.1.0-test".into(),
            ledger: Arc::new(Ledger::new()),
            metrics: Arc::new(crate::metrics::NodeMetrics::new().unwrap()),
            faucet_grant: Amount::from_coins(100).unwrap(),
        }
    }

    fn coins(n: u64) -> Amount {
        Amount::from_coins(n).unwrap()
    }

    /// Sends a GET request and returns the (status, parsed JSON body).
    async fn get(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        send(router, req).await
    }

    /// Sends a POST request with a raw body and returns (status, parsed JSON body).
    async fn post_raw(router: &Router, path: &str, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        send(router, req).await
    }

    async fn post_json(
        router: &Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        post_raw(router, path, serde_json::to_vec(&body).unwrap()).await
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    // -- Health / status -----------------------------------------------------

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn status_reports_genesis_only_ledger() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chain_length"], 1);
        assert_eq!(json["accounts"], 0);
        assert_eq!(json["version"], "0.1.0-test");
        assert_eq!(
            json["head_hash"],
            chain_hash(&Transaction::genesis()).as_str()
        );
    }

    // -- Transfers -----------------------------------------------------------

    #[tokio::test]
    async fn airdrop_then_transfer() {
        let state = test_app_state();
        let router = create_router(state.clone());
        let alice = Wallet::generate("alice").unwrap();
        let bob = Wallet::generate("bob").unwrap();

        let (status, json) =
            post_json(&router, "/airdrop", serde_json::json!({ "address": alice.address() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Airdropped 100 coins");
        assert_eq!(json["balance"], 100.0);

        let request = alice.sign_transfer(&bob.address(), coins(40)).unwrap();
        let (status, json) = post_json(
            &router,
            "/transaction",
            serde_json::to_value(&request).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Transaction verified and recorded");
        assert_eq!(
            json["previous_block"],
            chain_hash(&Transaction::genesis()).as_str()
        );

        let (_, json) = get(&router, &format!("/balance/{}", alice.address())).await;
        assert_eq!(json["balance"], 60.0);
        let (_, json) = get(&router, &format!("/balance/{}", bob.address())).await;
        assert_eq!(json["balance"], 40.0);

        assert_eq!(state.metrics.transactions_accepted_total.get(), 1);
        assert_eq!(state.metrics.airdrops_total.get(), 1);
        assert_eq!(state.metrics.chain_length.get(), 2);
    }

    #[tokio::test]
    async fn unfunded_transfer_is_insufficient_balance() {
        let state = test_app_state();
        let router = create_router(state.clone());
        let alice = Wallet::generate("alice").unwrap();
        let request = alice.sign_transfer("bob", coins(10)).unwrap();

        let (status, json) = post_json(
            &router,
            "/transaction",
            serde_json::to_value(&request).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Insufficient balance");
        assert_eq!(
            state
                .metrics
                .transactions_rejected_total
                .with_label_values(&["insufficient_funds"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn forged_signature_is_unauthorized() {
        let router = create_router(test_app_state());
        let alice = Wallet::generate("alice").unwrap();
        post_json(&router, "/airdrop", serde_json::json!({ "address": alice.address() })).await;

        let mut request = alice.sign_transfer("bob", coins(1)).unwrap();
        request.recipient = "mallory".into();
        let (status, json) = post_json(
            &router,
            "/transaction",
            serde_json::to_value(&request).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Invalid signature");
    }

    #[tokio::test]
    async fn malformed_sender_is_bad_request() {
        let router = create_router(test_app_state());
        let (status, json) = post_json(
            &router,
            "/transaction",
            serde_json::json!({
                "sender": "zz",
                "recipient": "bob",
                "amount": 1.5,
                "signature": "AAAA",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid sender public key (not hex)");
    }

    #[tokio::test]
    async fn unparseable_body_is_invalid_json() {
        let router = create_router(test_app_state());
        let (status, json) = post_raw(&router, "/transaction", b"{not json".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid JSON");

        // Three decimal places can't be represented, so the body is rejected whole.
        let (status, json) = post_json(
            &router,
            "/transaction",
            serde_json::json!({
                "sender": "00",
                "recipient": "bob",
                "amount": 1.234,
                "signature": "AAAA",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid JSON");
    }

    // -- Queries -------------------------------------------------------------

    #[tokio::test]
    async fn unknown_balance_is_zero() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/balance/nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["address"], "nobody");
        assert_eq!(json["balance"], 0.0);
    }

    #[tokio::test]
    async fn transaction_listings() {
        let router = create_router(test_app_state());
        let alice = Wallet::generate("alice").unwrap();
        post_json(&router, "/airdrop", serde_json::json!({ "address": alice.address() })).await;
        let request = alice.sign_transfer("bob", coins(5)).unwrap();
        post_json(
            &router,
            "/transaction",
            serde_json::to_value(&request).unwrap(),
        )
        .await;

        let (status, json) = get(&router, "/transactions").await;
        assert_eq!(status, StatusCode::OK);
        let all = json.as_array().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["sender"], "GENESIS");
        assert_eq!(all[0]["previous_block"], "");

        let (_, json) = get(&router, "/transactions/bob").await;
        assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(json["transactions"][0]["amount"], 5.0);

        let (_, json) = get(&router, "/transactions/carol").await;
        assert_eq!(json["transactions"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn airdrop_requires_an_address() {
        let router = create_router(test_app_state());
        let (status, json) = post_json(&router, "/airdrop", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing address");
    }

    #[tokio::test]
    async fn chain_verifies() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/chain/verify").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valid"], true);
        assert_eq!(json["length"], 1);
    }

    #[test]
    fn coin_labels() {
        assert_eq!(coins_label(coins(100)), "100");
        assert_eq!(coins_label(Amount::from_minor_units(250)), "2.50");
    }
}
