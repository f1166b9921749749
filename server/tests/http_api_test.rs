//! HTTP API tests.
//!
//! Drive the full router over mock providers and the in-memory store:
//! registration intake, gateway ordering, callback verification, failure
//! recording, and the CSV export.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use festpass_registration::config::{NotificationConfig, PaymentConfig};
use festpass_registration::mocks::{
    MockConfirmationMailer, MockLedgerClient, MockPaymentGateway, MockWebhookNotifier,
};
use festpass_registration::signature::sign_callback;
use festpass_registration::stores::{
    InMemoryPassRepository, InMemoryRegistrationStore, InMemorySubEventRepository,
};
use festpass_registration::types::{Amount, EventId, Pass, PassId, SubEvent};
use festpass_registration::{RegistrationEnvironment, RegistrationService};
use festpass_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

const KEY_SECRET: &str = "secret_placeholder";

struct TestApp {
    server: TestServer,
    mailer: MockConfirmationMailer,
    gateway: MockPaymentGateway,
    pass: Pass,
    sports_pass: Pass,
    football: SubEvent,
}

fn test_app(bypass: bool) -> TestApp {
    let passes = InMemoryPassRepository::new();
    let sub_events = InMemorySubEventRepository::new();
    let gateway = MockPaymentGateway::new();
    let mailer = MockConfirmationMailer::new();

    let pass = Pass {
        id: PassId::new(),
        name: "Standard Pass".to_string(),
        price: Amount::from_raw("299"),
        is_active: true,
        color: "blue".to_string(),
    };
    let sports_pass = Pass {
        id: PassId::new(),
        name: "Sports Pass".to_string(),
        price: Amount::from_raw("200"),
        is_active: true,
        color: "red".to_string(),
    };
    passes.insert(pass.clone());
    passes.insert(sports_pass.clone());

    let football = SubEvent {
        id: EventId::new(),
        name: "Football".to_string(),
        team_price: Some(600),
    };
    sub_events.insert(football.clone());

    let env = RegistrationEnvironment::new(
        Arc::new(InMemoryRegistrationStore::new()),
        Arc::new(passes),
        Arc::new(sub_events),
        Arc::new(gateway.clone()),
        Arc::new(mailer.clone()),
        PaymentConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: KEY_SECRET.to_string(),
            currency: "INR".to_string(),
            bypass,
        },
        NotificationConfig {
            send_confirmation_email: true,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@festpass.example.com".to_string(),
            from_name: "FestPass".to_string(),
            ledger_webhook_url: None,
            automation_webhook_url: None,
        },
    )
    .with_ledger(Arc::new(MockLedgerClient::new()))
    .with_webhook(Arc::new(MockWebhookNotifier::new()));

    let state = AppState::without_pool(RegistrationService::new(env));
    let server = TestServer::new(build_router(state)).unwrap();

    TestApp {
        server,
        mailer,
        gateway,
        pass,
        sports_pass,
        football,
    }
}

fn register_body(pass_id: PassId, event_ids: &[EventId]) -> Value {
    json!({
        "passId": pass_id.as_uuid(),
        "eventIds": event_ids.iter().map(|id| *id.as_uuid()).collect::<Vec<_>>(),
        "name": "Asha Nair",
        "rollNo": "21CS042",
        "email": "asha@example.com",
        "phone": "9876543210",
        "department": "CSE",
        "year": "3",
        "college": "Govt Engineering College",
        "district": "Kochi",
    })
}

#[tokio::test]
async fn test_register_returns_created_pending() {
    let app = test_app(false);

    let response = app
        .server
        .post("/registrations")
        .json(&register_body(app.pass.id, &[]))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["paymentStatus"], "Pending");
    assert_eq!(body["amount"], "299");
    assert!(body["ticketId"].as_str().unwrap().starts_with("ST"));
    assert!(body["registrationId"].as_str().is_some());
}

#[tokio::test]
async fn test_register_missing_field_is_422() {
    let app = test_app(false);

    let mut body = register_body(app.pass.id, &[]);
    body["email"] = json!("");

    let response = app.server.post("/registrations").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_unknown_pass_is_404() {
    let app = test_app(false);

    let response = app
        .server
        .post("/registrations")
        .json(&register_body(PassId::new(), &[]))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_payment_flow_over_http() {
    let app = test_app(false);

    // 1. Register for the sports pass with a team-priced event.
    let response = app
        .server
        .post("/registrations")
        .json(&register_body(app.sports_pass.id, &[app.football.id]))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["amount"], "600");
    let registration_id = body["registrationId"].as_str().unwrap().to_string();

    // 2. Create a gateway order: first tier, minor units.
    let response = app
        .server
        .post("/payment/order")
        .json(&json!({ "amount": "600", "receipt": registration_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let order: Value = response.json();
    assert_eq!(order["amount"], 60_000);
    let order_id = order["id"].as_str().unwrap().to_string();

    // 3. Verify the callback with a valid signature.
    let signature = sign_callback(&order_id, "pay_42", KEY_SECRET);
    let response = app
        .server
        .post("/payment/verify")
        .json(&json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_42",
            "razorpay_signature": signature,
            "registrationId": registration_id,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Payment verified successfully");

    tokio::task::yield_now().await;
    assert_eq!(app.mailer.sent_count(), 1);
}

#[tokio::test]
async fn test_verify_with_bad_signature_is_400() {
    let app = test_app(false);

    let response = app
        .server
        .post("/registrations")
        .json(&register_body(app.pass.id, &[]))
        .await;
    let registration_id = response.json::<Value>()["registrationId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .server
        .post("/payment/verify")
        .json(&json!({
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "deadbeef",
            "registrationId": registration_id,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid payment signature");
    assert_eq!(app.mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_payment_failed_records_reason_and_stays_payable() {
    let app = test_app(false);

    let response = app
        .server
        .post("/registrations")
        .json(&register_body(app.pass.id, &[]))
        .await;
    let registration_id = response.json::<Value>()["registrationId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .server
        .post("/payment/failed")
        .json(&json!({ "registrationId": registration_id, "reason": "checkout dismissed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // A later valid callback still completes the registration.
    let signature = sign_callback("order_7", "pay_7", KEY_SECRET);
    let response = app
        .server
        .post("/payment/verify")
        .json(&json!({
            "razorpay_order_id": "order_7",
            "razorpay_payment_id": "pay_7",
            "razorpay_signature": signature,
            "registrationId": registration_id,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_bypass_mode_never_orders_from_gateway() {
    let app = test_app(true);

    let response = app
        .server
        .post("/registrations")
        .json(&register_body(app.pass.id, &[]))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["paymentStatus"], "Completed");

    tokio::task::yield_now().await;
    assert_eq!(app.gateway.order_count(), 0);
    assert_eq!(app.mailer.sent_count(), 1);
}

#[tokio::test]
async fn test_event_export_returns_csv() {
    let app = test_app(false);

    app.server
        .post("/registrations")
        .json(&register_body(app.sports_pass.id, &[app.football.id]))
        .await;

    let response = app
        .server
        .get(&format!(
            "/registrations/events/{}/export",
            app.football.id.as_uuid()
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let csv = response.text();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("ticket_id,"));
    assert!(lines.next().unwrap().contains("Asha Nair"));
}

#[tokio::test]
async fn test_health_probes() {
    let app = test_app(false);

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // No pool configured: readiness reports ready without a DB ping.
    let response = app.server.get("/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
