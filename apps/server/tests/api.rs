use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tenorvest_core::settings::EngineSettings;
use tenorvest_core::utils::FixedClock;
use tenorvest_server::{api::app_router, build_state_with_clock, config::Config};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
    _dir: TempDir,
}

impl TestApp {
    async fn start() -> Self {
        let dir = tempdir().unwrap();
        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: dir.path().join("api.db").to_string_lossy().to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            accrual_interval: Duration::from_secs(86_400),
            accrual_initial_delay: Duration::from_secs(60),
            engine: EngineSettings {
                referral_bonus_percent: Decimal::TEN,
                ..EngineSettings::default()
            },
        };
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
        ));
        let state = build_state_with_clock(&config, clock.clone()).await.unwrap();
        let router = app_router(state, &config).unwrap();
        Self {
            router,
            clock,
            _dir: dir,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{}", uri));
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }
}

fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

/// alice refers bob; bob deposits 250 and it is approved.
async fn funded_pair(app: &TestApp) {
    let (status, _) = app.post("/accounts", json!({ "id": "alice" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post("/accounts", json!({ "id": "bob", "referredBy": "alice" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, deposit) = app
        .post("/accounts/bob/deposits", json!({ "amount": "250" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(deposit["status"], "pending");

    let deposit_id = deposit["id"].as_str().unwrap();
    let (status, resolved) = app
        .post(
            &format!("/admin/deposits/{}/resolve", deposit_id),
            json!({ "decision": "approve" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "completed");
}

async fn seed_product(app: &TestApp) -> String {
    let (status, product) = app
        .post(
            "/products",
            json!({
                "name": "Thirty day note",
                "ticketSize": "100",
                "dailyGrowthRate": "2",
                "durationDays": 30
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    product["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_reports_ok_with_request_id() {
    let app = TestApp::start().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn deposit_approval_credits_balance_and_referrer() {
    let app = TestApp::start().await;
    funded_pair(&app).await;

    let (_, bob) = app.get("/accounts/bob").await;
    assert_eq!(money(&bob["balance"]), Decimal::from(250));
    assert!(bob.get("withdrawalPasswordHash").is_none());

    let (_, alice) = app.get("/accounts/alice").await;
    assert_eq!(money(&alice["referralBonus"]), Decimal::from(25));

    let (_, pending) = app.get("/admin/deposits/pending").await;
    assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn investment_claim_withdraw_and_settle() {
    let app = TestApp::start().await;
    funded_pair(&app).await;
    let product_id = seed_product(&app).await;

    let (status, investment) = app
        .post(
            "/accounts/bob/investments",
            json!({ "productId": product_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let investment_id = investment["id"].as_str().unwrap().to_string();
    assert_eq!(money(&investment["finalValueCap"]), Decimal::from(200));

    app.clock.advance(ChronoDuration::days(5));
    let (status, valuation) = app
        .get(&format!("/accounts/bob/investments/{}/value", investment_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&valuation["currentValue"]), Decimal::from(110));
    assert_eq!(money(&valuation["claimableProfit"]), Decimal::from(10));

    let claim_uri = format!("/accounts/bob/investments/{}/claim", investment_id);
    let (status, receipt) = app.post(&claim_uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&receipt["claimedAmount"]), Decimal::from(10));
    assert_eq!(money(&receipt["newBalance"]), Decimal::from(160));

    let (status, body) = app.post(&claim_uri, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);

    let (status, request) = app
        .post(
            "/accounts/bob/withdrawals",
            json!({
                "amount": "40",
                "source": "profit",
                "destinationAddress": "TQ7rWalletAddress"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = request["id"].as_str().unwrap().to_string();

    let (_, eligibility) = app.get("/accounts/bob/eligibility").await;
    assert_eq!(money(&eligibility["pendingWithdrawals"]), Decimal::from(40));

    let (status, approved) = app
        .post(
            &format!("/admin/withdrawals/{}/resolve", request_id),
            json!({ "decision": "approve", "txReference": "0xabc" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (status, _) = app
        .post(
            &format!("/admin/withdrawals/{}/resolve", request_id),
            json!({ "decision": "reject", "reason": "late" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.clock.advance(ChronoDuration::days(55));
    let (status, report) = app.post("/admin/accrual/run", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["completed"], 1);

    // Growth stops at day 30: 160 value, 10 already claimed.
    let (_, bob) = app.get("/accounts/bob").await;
    assert_eq!(money(&bob["balance"]), Decimal::from(170));
    assert_eq!(money(&bob["totalWithdrawn"]), Decimal::from(40));

    let (_, summary) = app.get("/accounts/bob/summary").await;
    assert_eq!(summary["activeCount"], 0);
}

#[tokio::test]
async fn withdrawal_errors_map_to_statuses() {
    let app = TestApp::start().await;
    funded_pair(&app).await;

    let (status, body) = app
        .post(
            "/accounts/alice/withdrawals",
            json!({
                "amount": "30",
                "source": "referral_bonus",
                "destinationAddress": "TQ7rWalletAddress"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("Insufficient funds"));

    let (status, body) = app
        .post(
            "/accounts/alice/withdrawals",
            json!({
                "amount": "5",
                "source": "referral_bonus",
                "destinationAddress": "TQ7rWalletAddress"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = app.get("/accounts/nobody/eligibility").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn withdrawal_password_gates_requests() {
    let app = TestApp::start().await;
    funded_pair(&app).await;

    let (status, _) = app
        .send(
            Method::PUT,
            "/accounts/bob/withdrawal-password",
            Some(json!({ "newPassword": "hunter22" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let request = |password: Option<&str>| {
        json!({
            "amount": "20",
            "source": "profit",
            "destinationAddress": "TQ7rWalletAddress",
            "password": password
        })
    };
    let (status, _) = app
        .post("/accounts/bob/withdrawals", request(Some("wrong-one")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/accounts/bob/withdrawals", request(Some("hunter22")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_account_is_a_conflict() {
    let app = TestApp::start().await;
    let (status, _) = app.post("/accounts", json!({ "id": "carol" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/accounts", json!({ "id": "carol" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn config_rejects_unparsable_values() {
    std::env::set_var("TV_REQUEST_TIMEOUT_MS", "soon");
    assert!(Config::from_env().is_err());
    std::env::remove_var("TV_REQUEST_TIMEOUT_MS");

    std::env::set_var("TV_WITHDRAWAL_FEE_PERCENT", "150");
    assert!(Config::from_env().is_err());
    std::env::remove_var("TV_WITHDRAWAL_FEE_PERCENT");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request_timeout, Duration::from_millis(30_000));
    assert_eq!(config.accrual_interval, Duration::from_secs(86_400));
}
