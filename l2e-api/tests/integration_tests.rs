//! Integration tests for the Learn2Earn API
//!
//! Drive the router end to end against an in-memory SQLite store and a
//! scripted ledger gateway that counts its calls.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use l2e_api::{create_router, ApiConfig, AppState};
use l2e_core::{
    ApprovedEntry, LedgerGateway, LedgerOutcome, NewSubmission, StoreError, StoreResult,
    Submission, SubmissionStore, Verdict, WalletAddress,
};
use l2e_db::{open_store, DbConfig, MemorySubmissionStore};
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MODERATOR_KEY: &str = "test-moderator-key";
const SIGNER: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";
const WALLET: &str = "0xABCDEF0123456789abcdef0123456789ABCDEF01";
const WALLET_LOWER: &str = "0xabcdef0123456789abcdef0123456789abcdef01";

/// Ledger gateway returning a scripted outcome after an optional delay
struct MockGateway {
    outcome: Mutex<LedgerOutcome>,
    calls: AtomicUsize,
    delay: Duration,
}

impl MockGateway {
    fn confirming(tx_id: &str) -> Arc<Self> {
        Self::with_outcome(LedgerOutcome::Confirmed { tx_id: tx_id.to_string() })
    }

    fn with_outcome(outcome: LedgerOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        })
    }

    fn slow(tx_id: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(LedgerOutcome::Confirmed { tx_id: tx_id.to_string() }),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerGateway for MockGateway {
    async fn grade_on_chain(&self, _identity: &WalletAddress, _approved: bool) -> LedgerOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.lock().unwrap().clone()
    }

    fn signer_address(&self) -> Option<String> {
        Some(SIGNER.to_string())
    }
}

/// Store whose finalize always fails
struct FailingFinalizeStore {
    inner: MemorySubmissionStore,
}

#[async_trait]
impl SubmissionStore for FailingFinalizeStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn create(&self, input: NewSubmission) -> StoreResult<Submission> {
        self.inner.create(input).await
    }

    async fn get(&self, identity: &WalletAddress) -> StoreResult<Option<Submission>> {
        self.inner.get(identity).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Submission>> {
        self.inner.list_all().await
    }

    async fn list_pending(&self) -> StoreResult<Vec<Submission>> {
        self.inner.list_pending().await
    }

    async fn list_approved(&self) -> StoreResult<Vec<ApprovedEntry>> {
        self.inner.list_approved().await
    }

    async fn finalize_decision(
        &self,
        _identity: &WalletAddress,
        _verdict: Verdict,
        _notes: Option<String>,
        _tx_id: Option<String>,
    ) -> StoreResult<Submission> {
        Err(StoreError::Backend("disk I/O error".to_string()))
    }
}

fn test_config() -> ApiConfig {
    ApiConfig {
        moderator_key: MODERATOR_KEY.to_string(),
        ..Default::default()
    }
}

fn create_server_with(store: Arc<dyn SubmissionStore>, gateway: Arc<MockGateway>) -> TestServer {
    let state = AppState::new(&test_config(), store, gateway);
    TestServer::new(create_router(state)).unwrap()
}

async fn create_test_server(gateway: Arc<MockGateway>) -> TestServer {
    let store = open_store(&DbConfig::in_memory()).await.unwrap();
    create_server_with(store, gateway)
}

fn key_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-moderator-key"),
        HeaderValue::from_static(MODERATOR_KEY),
    )
}

fn wallet(n: u8) -> String {
    format!("0x{:040x}", n)
}

async fn submit(server: &TestServer, identity: &str, name: &str) {
    server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": identity,
            "displayName": name,
            "proofReference": "https://example.org/certificate"
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn moderate(server: &TestServer, identity: &str, approved: bool) -> axum_test::TestResponse {
    let (name, value) = key_header();
    server
        .put(&format!("/api/v1/submissions/{}/approve", identity))
        .add_header(name, value)
        .json(&json!({ "approved": approved, "moderatorNotes": "reviewed" }))
        .await
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "sqlite");
    assert_eq!(body["signerAddress"], SIGNER);
}

#[tokio::test]
async fn test_ready_check() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}

// ============ Submission Endpoint Tests ============

#[tokio::test]
async fn test_submit_then_approve_scenario() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;

    let response = server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": WALLET,
            "displayName": "Ada",
            "proofReference": "https://example.org/certificate"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["identity"], WALLET_LOWER);

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["submitted"], true);
    assert_eq!(status["approved"], false);
    assert_eq!(status["claimed"], false);
    assert!(status["transactionHash"].is_null());

    let response = moderate(&server, WALLET, true).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["approved"], true);
    assert_eq!(body["txId"], "0x1");
    assert_eq!(body["rewardsDistributed"], true);
    assert_eq!(gateway.calls(), 1);

    let status: Value = server
        .get(&format!("/api/v1/submissions/{}", WALLET_LOWER))
        .await
        .json();
    assert_eq!(status["approved"], true);
    assert_eq!(status["claimed"], true);
    assert_eq!(status["transactionHash"], "0x1");
    assert!(status["approvedAt"].is_string());
    assert!(status["claimedAt"].is_string());
}

#[tokio::test]
async fn test_duplicate_submission_any_case() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;
    submit(&server, WALLET, "first").await;

    let response = server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": WALLET_LOWER,
            "displayName": "second",
            "proofReference": "https://example.org/other"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "DUPLICATE");

    let all: Value = server.get("/api/v1/submissions").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["displayName"], "first");
}

#[tokio::test]
async fn test_submission_validation() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;

    let missing = server
        .post("/api/v1/submissions")
        .json(&json!({ "identity": WALLET, "displayName": "Ada" }))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = missing.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("proofReference"));

    let malformed = server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": "0x1234",
            "displayName": "Ada",
            "proofReference": "https://example.org"
        }))
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);

    let too_long = server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": WALLET,
            "displayName": "x".repeat(257),
            "proofReference": "https://example.org"
        }))
        .await;
    too_long.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = too_long.json();
    assert!(body["error"].as_str().unwrap().contains("displayName"));

    let blank = server
        .post("/api/v1/submissions")
        .json(&json!({
            "identity": WALLET,
            "displayName": "   ",
            "proofReference": "https://example.org"
        }))
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);

    let not_json = server.post("/api/v1/submissions").text("hello").await;
    not_json.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = not_json.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let all: Value = server.get("/api/v1/submissions").await.json();
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_submission_errors() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;

    let response = server.get(&format!("/api/v1/submissions/{}", wallet(1))).await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");

    let response = server.get("/api/v1/submissions/not-an-address").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listings() {
    let server = create_test_server(MockGateway::confirming("0x1")).await;
    for n in 1..=3 {
        submit(&server, &wallet(n), &format!("user{n}")).await;
        // distinct timestamps
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    moderate(&server, &wallet(2), true).await.assert_status_ok();

    let all: Value = server.get("/api/v1/submissions").await.json();
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["user3", "user2", "user1"]);
    assert_eq!(all[1]["moderatorNotes"], "reviewed");

    let approved: Value = server.get("/api/v1/submissions/approved").await.json();
    assert_eq!(approved, json!([{ "identity": wallet(2), "displayName": "user2" }]));

    let pending: Value = server.get("/api/v1/submissions/pending").await.json();
    let pending_ids: Vec<&str> = pending
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["identity"].as_str().unwrap())
        .collect();
    assert_eq!(pending_ids, vec![wallet(1), wallet(3)]);
}

// ============ Moderation Endpoint Tests ============

#[tokio::test]
async fn test_missing_key_is_unauthorized() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    let response = server
        .put(&format!("/api/v1/submissions/{}/approve", WALLET))
        .json(&json!({ "approved": true }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(gateway.calls(), 0);

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["decision"], "pending");
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    let response = server
        .put(&format!("/api/v1/submissions/{}/approve", WALLET))
        .add_header(
            HeaderName::from_static("x-moderator-key"),
            HeaderValue::from_static("guess"),
        )
        .json(&json!({ "approved": true }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(gateway.calls(), 0);
    let pending: Value = server.get("/api/v1/submissions/pending").await.json();
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ledger_revert_leaves_pending() {
    let gateway = MockGateway::with_outcome(LedgerOutcome::Reverted {
        tx_id: "0xdead".to_string(),
        reason: "Transaction was reverted: Already graded".to_string(),
    });
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    let response = moderate(&server, WALLET, true).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "LEDGER_FAILURE");
    assert!(body["error"].as_str().unwrap().contains("Already graded"));

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["approved"], false);
    assert_eq!(status["claimed"], false);
    assert!(status["transactionHash"].is_null());

    // retry reaches the ledger again
    *gateway.outcome.lock().unwrap() = LedgerOutcome::Confirmed { tx_id: "0x2".to_string() };
    moderate(&server, WALLET, true).await.assert_status_ok();
    assert_eq!(gateway.calls(), 2);
}

#[tokio::test]
async fn test_unconfirmed_is_ledger_failure() {
    let gateway = MockGateway::with_outcome(LedgerOutcome::Unconfirmed {
        tx_id: "0xbeef".to_string(),
        reason: "No receipt for 0xbeef after 120s".to_string(),
    });
    let server = create_test_server(gateway).await;
    submit(&server, WALLET, "Ada").await;

    let response = moderate(&server, WALLET, true).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "LEDGER_FAILURE");

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["decision"], "pending");
}

#[tokio::test]
async fn test_reject_records_transaction() {
    let gateway = MockGateway::confirming("0x77");
    let server = create_test_server(gateway).await;
    submit(&server, WALLET, "Ada").await;

    let response = moderate(&server, WALLET, false).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["approved"], false);
    assert_eq!(body["rewardsDistributed"], false);
    assert_eq!(body["message"], "Submission rejected");

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["decision"], "rejected");
    assert_eq!(status["claimed"], false);
    assert_eq!(status["transactionHash"], "0x77");
    assert!(status["approvedAt"].is_null());
}

#[tokio::test]
async fn test_decided_submission_conflicts() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    moderate(&server, WALLET, true).await.assert_status_ok();
    let response = moderate(&server, WALLET, false).await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "ALREADY_DECIDED");
    assert_eq!(gateway.calls(), 1);

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["approved"], true);
}

#[tokio::test]
async fn test_unknown_identity_not_found() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;

    let response = moderate(&server, &wallet(42), true).await;
    response.assert_status_not_found();
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_missing_approved_flag() {
    let gateway = MockGateway::confirming("0x1");
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    let (name, value) = key_header();
    let response = server
        .put(&format!("/api/v1/submissions/{}/approve", WALLET))
        .add_header(name, value)
        .json(&json!({ "moderatorNotes": "forgot the flag" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_approvals_single_ledger_call() {
    let gateway = MockGateway::slow("0x1", Duration::from_millis(50));
    let server = create_test_server(gateway.clone()).await;
    submit(&server, WALLET, "Ada").await;

    let path = format!("/api/v1/submissions/{}/approve", WALLET_LOWER);
    let (name, value) = key_header();
    let first = server
        .put(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "approved": true }));
    let second = server
        .put(&path)
        .add_header(name, value)
        .json(&json!({ "approved": true }));

    let (a, b) = tokio::join!(first.into_future(), second.into_future());

    let mut statuses = vec![a.status_code(), b.status_code()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_store_failure_after_ledger_success() {
    let gateway = MockGateway::confirming("0xfeed");
    let store = Arc::new(FailingFinalizeStore {
        inner: MemorySubmissionStore::new(),
    });
    let server = create_server_with(store, gateway.clone());
    submit(&server, WALLET, "Ada").await;

    let response = moderate(&server, WALLET, true).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORE_FAILURE");
    assert!(body["error"].as_str().unwrap().contains("0xfeed"));
    assert_eq!(gateway.calls(), 1);

    let status: Value = server.get(&format!("/api/v1/submissions/{}", WALLET)).await.json();
    assert_eq!(status["approved"], false);
}

#[tokio::test]
async fn test_moderation_disabled_without_key() {
    let gateway = MockGateway::confirming("0x1");
    let store = Arc::new(MemorySubmissionStore::new());
    let state = AppState::new(&ApiConfig::default(), store, gateway.clone());
    let server = TestServer::new(create_router(state)).unwrap();
    submit(&server, WALLET, "Ada").await;

    let response = server
        .put(&format!("/api/v1/submissions/{}/approve", WALLET))
        .add_header(HeaderName::from_static("x-moderator-key"), HeaderValue::from_static(""))
        .json(&json!({ "approved": true }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_client_disconnect_does_not_abort_moderation() {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    let gateway = MockGateway::slow("0xd15c", Duration::from_millis(300));
    let store = Arc::new(MemorySubmissionStore::new());
    store
        .create(NewSubmission::new(WALLET, "Ada", "https://example.org/certificate").unwrap())
        .await
        .unwrap();

    let config = ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..test_config()
    };
    let addr = l2e_api::start_background_server(&config, store.clone(), gateway.clone())
        .await
        .unwrap();

    // Send the moderation request, then hang up while the ledger call runs
    let disconnect_mid_request = move || async move {
        let body = r#"{"approved":true}"#;
        let request = format!(
            "PUT /api/v1/submissions/{}/approve HTTP/1.1\r\nHost: {}\r\n\
             Content-Type: application/json\r\nx-moderator-key: {}\r\n\
             Content-Length: {}\r\n\r\n{}",
            WALLET,
            addr,
            MODERATOR_KEY,
            body.len(),
            body
        );
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(stream);
    };

    disconnect_mid_request().await;
    assert_eq!(gateway.calls(), 1);

    let identity = WalletAddress::parse(WALLET).unwrap();
    let mut decided = None;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let record = store.get(&identity).await.unwrap().unwrap();
        if !record.decision.is_pending() {
            decided = Some(record);
            break;
        }
    }
    let decided = decided.expect("decision was not recorded after disconnect");
    assert!(decided.is_approved());
    assert_eq!(decided.ledger_tx_id.as_deref(), Some("0xd15c"));

    // A retry after the disconnect must not grade a second time
    disconnect_mid_request().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(gateway.calls(), 1);
}
