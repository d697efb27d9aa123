//! Router-level tests: routing, auth layers, envelopes and rate limits.

mod common;

use axum::Router;
use axum::body::Body;
use bakery_server::build_app;
use common::*;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "correct-horse-9",
            "name": "Ana",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "correct-horse-9" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn admin_token(h: &Harness) -> String {
    let who = admin(h).await;
    let customer = bakery_server::db::Store::customer_by_id(h.store.as_ref(), who.id)
        .await
        .unwrap()
        .unwrap();
    h.state.jwt.generate_token(&customer, t0()).unwrap().0
}

#[tokio::test]
async fn test_health_and_request_id() {
    let h = harness();
    let app = build_app(h.state.clone());

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_bearer_routes_require_token() {
    let h = harness();
    let app = build_app(h.state.clone());

    let (status, body) = send(&app, "GET", "/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["errors"]["code"].is_number());

    let (status, _) = send(&app, "GET", "/cart", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // catalogue stays public
    let (status, body) = send(&app, "GET", "/menus", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_admin_routes_reject_customers() {
    let h = harness();
    let app = build_app(h.state.clone());
    let token = register_and_login(&app, "ana@bakery.test").await;

    let (status, body) = send(
        &app,
        "POST",
        "/menus",
        Some(&token),
        Some(json!({ "title": "Rye", "price": 30000 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["errors"]["code"], 2002);

    let (status, _) = send(&app, "GET", "/inventory", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let h = harness();
    let app = build_app(h.state.clone());

    let (status, body) =
        send(&app, "POST", "/auth/register", None, Some(json!({ "email": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["code"], 5);
    assert_eq!(body["errors"]["part"], "body");
    assert!(body["message"].is_string());

    let token = register_and_login(&app, "ana@bakery.test").await;
    let (status, body) = send(&app, "GET", "/orders/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["part"], "path");

    let (status, body) = send(&app, "GET", "/orders?page=first", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["part"], "query");

    let admin = admin_token(&h).await;
    let (status, body) = send(
        &app,
        "PATCH",
        "/orders/1/status",
        Some(&admin),
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["code"], 5);
}

#[tokio::test]
async fn test_checkout_flow_over_http() {
    let h = harness();
    let app = build_app(h.state.clone());
    let boss = admin_token(&h).await;
    let token = register_and_login(&app, "ana@bakery.test").await;

    // 1. staff adds a menu item
    let (status, body) = send(
        &app,
        "POST",
        "/menus",
        Some(&boss),
        Some(json!({ "title": "Sourdough", "price": 50000, "category": "bread" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let menu_id = body["data"]["id"].as_i64().unwrap();

    // 2. customer orders two
    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(&token),
        Some(json!({
            "items": [{ "menu_id": menu_id, "quantity": 2, "price": 50000 }],
            "delivery_address": "A",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["total_price"].as_f64(), Some(100000.0));
    let order_id = body["data"]["id"].as_i64().unwrap();

    // 3. checkout redirect
    let (status, body) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/payment"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token"], "snap-token-1");

    // 4. provider settles
    let raw = signed_notification(order_id, "200", "100000.00", "settlement", None);
    let notification: Value = serde_json::from_slice(&raw).unwrap();
    for _ in 0..2 {
        let (status, body) =
            send(&app, "POST", "/payment/notification", None, Some(notification.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["order_status"], "paid");
        assert_eq!(body["data"]["payment_status"], "success");
    }

    // 5. order reads back paid with one audit entry per change
    let (_, body) = send(&app, "GET", &format!("/orders/{order_id}"), Some(&token), None).await;
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["customer"]["email"], "ana@bakery.test");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/orders/{order_id}/transitions"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // 6. admin cannot roll a paid order back to pending
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        Some(&boss),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"]["code"], 4003);
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_unauthorized() {
    let h = harness();
    let app = build_app(h.state.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/payment/notification",
        None,
        Some(json!({
            "order_id": "1",
            "status_code": "200",
            "gross_amount": "100000.00",
            "signature_key": "00",
            "transaction_status": "settlement",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"]["code"], 1005);
}

#[tokio::test]
async fn test_payment_config_is_public() {
    let h = harness();
    let app = build_app(h.state.clone());

    let (status, body) = send(&app, "GET", "/payment/config", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["client_key"], "SB-Mid-client-test-key");
    assert_eq!(body["data"]["merchant_id"], "G000000000");
    assert!(body["data"].get("server_key").is_none());
}

#[tokio::test]
async fn test_login_is_rate_limited() {
    let h = harness();
    let app = build_app(h.state.clone());

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let (status, _) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@bakery.test", "password": "wrong-password" })),
        )
        .await;
        statuses.push(status);
    }
    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}
