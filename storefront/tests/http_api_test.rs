//! The storefront API mounted on the real router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;
use axum_test::TestServer;
use loket_runtime::metrics::PrometheusMetrics;
use loket_storefront::payment_gateway::{
    DecliningGateway, PaymentGateway, PaymentLatency, SimulatedGateway,
};
use loket_storefront::server::{build_router, AppState};
use loket_storefront::{StorefrontEnvironment, StorefrontReducer, StorefrontState, StorefrontStore};
use loket_testing::{test_clock, SequentialIdGenerator};
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

fn server_with(gateway: Arc<dyn PaymentGateway>) -> TestServer {
    let environment = StorefrontEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
        gateway,
    );
    let store = Arc::new(StorefrontStore::new(
        StorefrontState::seeded(),
        StorefrontReducer::new(),
        environment,
    ));
    let metrics = PrometheusMetrics::detached().unwrap();
    let app = build_router(AppState::new(store, metrics, Duration::from_secs(5)));
    TestServer::new(app).unwrap()
}

fn server() -> TestServer {
    server_with(Arc::new(SimulatedGateway::instant()))
}

fn slow_server() -> TestServer {
    let slow = Duration::from_secs(30);
    server_with(SimulatedGateway::shared(PaymentLatency {
        credit_card: slow,
        bank_transfer: slow,
        e_wallet: slow,
    }))
}

const ATTEMPT: &str = "00000000-0000-4000-8000-000000000007";

/// Logs in, fills the cart and starts a payment under [`ATTEMPT`].
async fn start_payment(server: &TestServer) {
    log_in(server).await;
    server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-pameran-batik", "ticketTypeId": "regular", "quantity": 1}))
        .await
        .assert_status_ok();
    server
        .post("/api/dispatch")
        .json(&json!({
            "type": "CHECKOUT",
            "payload": {"attempt": ATTEMPT, "payment": {"method": "bank_transfer"}}
        }))
        .await
        .assert_status(StatusCode::ACCEPTED);
}

async fn log_in(server: &TestServer) {
    server
        .post("/api/login")
        .json(&json!({"email": "budi@example.com", "password": "x"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn lists_and_filters_events() {
    let server = server();

    let all: Vec<Value> = server.get("/api/events").await.json();
    assert_eq!(all.len(), 4);

    let exhibitions: Vec<Value> = server
        .get("/api/events")
        .add_query_param("type", "exhibition")
        .await
        .json();
    assert_eq!(exhibitions.len(), 1);
    assert_eq!(exhibitions[0]["id"], "evt-pameran-batik");
    assert_eq!(exhibitions[0]["priceFrom"], "Rp 75.000");
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let server = server();

    let response = server.get("/api/events/evt-nope").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_without_session_redirects_to_login() {
    let server = server();

    let response = server
        .post("/api/events/evt-jazz-gunung/booking")
        .json(&json!({"mode": "add_to_cart", "selection": {"vip": 1}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn checkout_with_empty_cart_points_to_cart() {
    let server = server();
    log_in(&server).await;

    let response = server
        .post("/api/checkout")
        .json(&json!({"method": "bank_transfer"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.header("location"), "/cart");
}

#[tokio::test]
async fn book_now_then_pay() {
    let server = server();
    log_in(&server).await;

    let booking = server
        .post("/api/events/evt-pesta-rakyat/booking")
        .json(&json!({"mode": "book_now", "selection": {"vip": 2}}))
        .await;
    booking.assert_status_ok();
    let booking: Value = booking.json();
    assert_eq!(booking["next"], "/checkout");
    assert_eq!(booking["ticketCount"], 2);

    let page: Value = server.get("/api/checkout").await.json();
    assert_eq!(page["totalFormatted"], "Rp 1.050.000");

    let paid = server
        .post("/api/checkout")
        .json(&json!({"method": "e_wallet", "provider": "ovo"}))
        .await;
    paid.assert_status_ok();
    let paid: Value = paid.json();
    assert_eq!(paid["next"], "/booking-confirmation");
    assert_eq!(paid["receipt"]["amount"], 1_050_000);
    assert_eq!(paid["confirmation"]["tickets"][0]["ticketType"], "VIP Floor");

    let cart: Value = server.get("/api/cart").await.json();
    assert_eq!(cart["lines"], json!([]));

    let event: Value = server.get("/api/events/evt-pesta-rakyat").await.json();
    assert_eq!(event["ticketTypes"][1]["available"], 2098);
}

#[tokio::test]
async fn incomplete_card_is_unprocessable() {
    let server = server();
    log_in(&server).await;
    server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-jazz-gunung", "ticketTypeId": "regular", "quantity": 1}))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/checkout")
        .json(&json!({
            "method": "credit_card",
            "cardNumber": "4111111111111111",
            "expiryDate": "",
            "cvv": "123",
            "cardholderName": "Budi"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn declined_payment_is_payment_required() {
    let server = server_with(Arc::new(DecliningGateway::new("Do not honor")));
    log_in(&server).await;
    server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-jazz-gunung", "ticketTypeId": "vip", "quantity": 1}))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/checkout")
        .json(&json!({"method": "bank_transfer"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
    let cart: Value = server.get("/api/cart").await.json();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cart_quantity_zero_removes_line() {
    let server = server();
    log_in(&server).await;
    server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-jazz-gunung", "ticketTypeId": "vip", "quantity": 3}))
        .await
        .assert_status_ok();

    let updated: Value = server
        .patch("/api/cart/evt-jazz-gunung/vip")
        .json(&json!({"quantity": 0}))
        .await
        .json();

    assert_eq!(updated["lines"], json!([]));
    assert_eq!(updated["next"], "/cart");

    let missing = server
        .delete("/api/cart/evt-jazz-gunung/vip")
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_rejects_mismatched_password() {
    let server = server();

    let response = server
        .post("/api/register")
        .json(&json!({
            "name": "Sari",
            "email": "sari@example.com",
            "password": "a",
            "confirmPassword": "b"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let session: Value = server.get("/api/session").await.json();
    assert_eq!(session["isAuthenticated"], false);
}

#[tokio::test]
async fn cancel_ticket_moves_it_to_history() {
    let server = server();
    log_in(&server).await;

    let response = server.post("/api/tickets/T-SEED-001/cancel").await;
    response.assert_status_ok();
    let tickets: Value = response.json();

    assert_eq!(tickets["active"], json!([]));
    assert_eq!(tickets["history"].as_array().unwrap().len(), 2);

    let unknown = server.post("/api/tickets/T-NOPE/cancel").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dispatch_ignores_unknown_action_types() {
    let server = server();

    let response = server
        .post("/api/dispatch")
        .json(&json!({"type": "SOMETHING_ELSE", "payload": {"x": 1}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body: Value = response.json();
    assert_eq!(body["handled"], false);

    let bad = server
        .post("/api/dispatch")
        .json(&json!({"type": "ADD_TO_CART", "payload": {"nope": true}}))
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn readiness_reports_store_health() {
    let server = server();

    let ready: Value = server.get("/ready").await.json();

    assert_eq!(ready["status"], "healthy");
}

#[tokio::test]
async fn cart_is_locked_while_paying() {
    let server = slow_server();
    start_payment(&server).await;

    let add = server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-jazz-gunung", "ticketTypeId": "vip", "quantity": 2}))
        .await;
    assert_eq!(add.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        server.delete("/api/cart").await.status_code(),
        StatusCode::CONFLICT
    );
    let booking = server
        .post("/api/events/evt-jazz-gunung/booking")
        .json(&json!({"mode": "book_now", "selection": {"vip": 1}}))
        .await;
    assert_eq!(booking.status_code(), StatusCode::CONFLICT);

    let cart: Value = server.get("/api/cart").await.json();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);

    let aborted: Value = server.post("/api/checkout/abort").await.json();
    assert_eq!(aborted["aborted"], ATTEMPT);
    server
        .post("/api/cart")
        .json(&json!({"eventId": "evt-jazz-gunung", "ticketTypeId": "vip", "quantity": 2}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn overlapping_aborts_each_get_their_own_answer() {
    let server = slow_server();
    start_payment(&server).await;

    let (first, second) = tokio::join!(
        server.post("/api/checkout/abort").into_future(),
        server.post("/api/checkout/abort").into_future(),
    );
    first.assert_status_ok();
    second.assert_status_ok();

    let mut answers = [
        first.json::<Value>()["aborted"].clone(),
        second.json::<Value>()["aborted"].clone(),
    ];
    answers.sort_by_key(Value::is_null);
    assert_eq!(answers, [json!(ATTEMPT), Value::Null], "only one request aborted the payment");

    let again: Value = server.post("/api/checkout/abort").await.json();
    assert_eq!(again["aborted"], Value::Null);
}
