//! Integration tests for the Yoco webhook endpoint.
//!
//! Drives the full axum router (middleware included) with signed requests
//! against the in-memory adapters.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use rentio::adapters::http::{app_router, WebhookAppState};
use rentio::adapters::memory::{
    BookingPaymentStatus, InMemoryBookingLedger, InMemoryProcessedWebhookStore,
};
use rentio::config::ServerConfig;
use rentio::domain::webhook::{compute_signature, WebhookSecret, YocoWebhookVerifier};

const SECRET: &str = "whsec_AAAAAAAAAAAAAAAAAAAAAA==";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    ledger: Arc<InMemoryBookingLedger>,
}

fn test_app() -> TestApp {
    let ledger = Arc::new(InMemoryBookingLedger::new());
    let state = WebhookAppState {
        verifier: Arc::new(YocoWebhookVerifier::new(WebhookSecret::new(SECRET))),
        booking_ledger: ledger.clone(),
        processed_webhooks: Arc::new(InMemoryProcessedWebhookStore::new()),
    };
    TestApp {
        router: app_router(state, &ServerConfig::default()),
        ledger,
    }
}

fn payment_succeeded_body() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "createdDate": "2024-02-01T09:42:01.000Z",
        "id": "evt_int_1",
        "type": "payment.succeeded",
        "payload": {
            "id": "p_int_1",
            "amount": 120000,
            "currency": "ZAR",
            "mode": "test",
            "status": "succeeded",
            "metadata": { "checkoutId": "ch_int_1", "bookingId": "bk_42" }
        }
    }))
    .unwrap()
}

fn sign(id: &str, timestamp: &str, body: &[u8]) -> String {
    let key = WebhookSecret::new(SECRET).key_bytes().unwrap();
    format!("v1,{}", compute_signature(&key, id, timestamp, body).unwrap())
}

fn webhook_request(headers: &[(&str, &str)], body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/yoco")
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body)).unwrap()
}

fn signed_request(id: &str, body: Vec<u8>) -> Request<Body> {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign(id, &timestamp, &body);
    webhook_request(
        &[
            ("webhook-id", id),
            ("webhook-timestamp", &timestamp),
            ("webhook-signature", &signature),
        ],
        body,
    )
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Accepted Deliveries
// =============================================================================

#[tokio::test]
async fn signed_payment_marks_booking_paid() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(signed_request("msg_int_1", payment_succeeded_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body, json!({ "received": true, "outcome": "booking_paid" }));

    let entry = app.ledger.entry("bk_42").await.unwrap();
    assert_eq!(entry.status, BookingPaymentStatus::Paid);
    assert_eq!(entry.paid_cents, 120000);
}

#[tokio::test]
async fn redelivery_is_acknowledged_without_reapplying() {
    let app = test_app();

    let first = app
        .router
        .clone()
        .oneshot(signed_request("msg_int_2", payment_succeeded_body()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .router
        .clone()
        .oneshot(signed_request("msg_int_2", payment_succeeded_body()))
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["outcome"], "already_processed");
    assert_eq!(app.ledger.entry("bk_42").await.unwrap().paid_cents, 120000);
}

#[tokio::test]
async fn rotated_signature_header_with_one_valid_token_is_accepted() {
    let app = test_app();
    let body = payment_succeeded_body();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let valid = sign("msg_int_3", &timestamp, &body);
    let header = format!("v1,c3RhbGUta2V5LXNpZ25hdHVyZQ== {}", valid);

    let response = app
        .router
        .oneshot(webhook_request(
            &[
                ("webhook-id", "msg_int_3"),
                ("webhook-timestamp", &timestamp),
                ("webhook-signature", &header),
            ],
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_event_type_is_acknowledged_as_ignored() {
    let app = test_app();
    let mut event: Value = serde_json::from_slice(&payment_succeeded_body()).unwrap();
    event["type"] = json!("checkout.expired");

    let response = app
        .router
        .oneshot(signed_request("msg_int_9", serde_json::to_vec(&event).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "received": true, "outcome": "ignored" })
    );
    assert!(app.ledger.entry("bk_42").await.is_none());
}

// =============================================================================
// Rejected Deliveries
// =============================================================================

#[tokio::test]
async fn missing_webhook_id_is_bad_request() {
    let app = test_app();
    let body = payment_succeeded_body();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign("msg_int_4", &timestamp, &body);

    let response = app
        .router
        .oneshot(webhook_request(
            &[
                ("webhook-timestamp", &timestamp),
                ("webhook-signature", &signature),
            ],
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_code"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn tampered_body_is_forbidden() {
    let app = test_app();
    let body = payment_succeeded_body();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign("msg_int_5", &timestamp, &body);
    let tampered = String::from_utf8(body)
        .unwrap()
        .replace("120000", "1")
        .into_bytes();

    let response = app
        .router
        .oneshot(webhook_request(
            &[
                ("webhook-id", "msg_int_5"),
                ("webhook-timestamp", &timestamp),
                ("webhook-signature", &signature),
            ],
            tampered,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error_code"], "INVALID_SIGNATURE");
    assert!(app.ledger.entry("bk_42").await.is_none());
}

#[tokio::test]
async fn stale_timestamp_is_bad_request() {
    let app = test_app();
    let body = payment_succeeded_body();
    let timestamp = (chrono::Utc::now().timestamp() - 600).to_string();
    let signature = sign("msg_int_6", &timestamp, &body);

    let response = app
        .router
        .oneshot(webhook_request(
            &[
                ("webhook-id", "msg_int_6"),
                ("webhook-timestamp", &timestamp),
                ("webhook-signature", &signature),
            ],
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_code"], "STALE_TIMESTAMP");
}

#[tokio::test]
async fn signed_non_json_body_is_bad_request() {
    let app = test_app();

    let response = app
        .router
        .oneshot(signed_request("msg_int_7", b"not json".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_code"], "UNPARSEABLE_BODY");
}

#[tokio::test]
async fn misconfigured_secret_is_server_error() {
    let state = WebhookAppState {
        verifier: Arc::new(YocoWebhookVerifier::new(WebhookSecret::new("not-a-whsec"))),
        booking_ledger: Arc::new(InMemoryBookingLedger::new()),
        processed_webhooks: Arc::new(InMemoryProcessedWebhookStore::new()),
    };
    let router = app_router(state, &ServerConfig::default());

    let response = router
        .oneshot(signed_request("msg_int_8", payment_succeeded_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error_code"], "MISCONFIGURED_SECRET");
    assert_eq!(body["message"], "Webhook could not be processed");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-abc-123");
}
