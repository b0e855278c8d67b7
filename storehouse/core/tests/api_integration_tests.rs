// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! HTTP API integration tests.
//!
//! Drives the full axum router over the in-memory backend with
//! `tower::ServiceExt::oneshot`, checking status codes, error bodies and the
//! JSON shape of the main resources.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use storehouse_core::application::Services;
use storehouse_core::presentation::app;

fn router() -> Router {
    app(Services::in_memory())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, method, uri, body, None).await
}

async fn send_as(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    user: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_account(app: &Router, name: &str, account_type: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "account_name": name, "account_type": account_type })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_account_lifecycle() {
    let app = router();
    let (status, body) = send_as(
        &app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "account_name": "Main Bank", "account_type": "Bank" })),
        Some("treasurer-7"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["account_name"], "Main Bank");
    assert_eq!(body["is_active"], true);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "account_name": "Main Bank", "account_type": "Bank" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/v1/accounts/{id}");
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deactivated successfully");

    let (status, _) = send(&app, Method::POST, &format!("{uri}/deactivate"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn test_invalid_account_type_is_bad_request() {
    let app = router();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "account_name": "Petty Cash", "account_type": "Cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid account type"));
}

#[tokio::test]
async fn test_malformed_and_unknown_ids() {
    let app = router();
    let (status, _) = send(&app, Method::GET, "/api/v1/members/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/members/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unreadable_request_is_bad_request_with_json_error() {
    let app = router();
    let bank = create_account(&app, "Main Bank", "Bank").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({ "transaction_type": "receipts", "debit_account_id": bank })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("amount"), "{body}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts",
        Some(json!({ "account_name": 42, "account_type": "Bank" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let uri = format!("/api/v1/transactions/{}?expand=maybe", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_sub_cent_amount_is_rejected() {
    let app = router();
    let bank = create_account(&app, "Main Bank", "Bank").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "transaction_type": "receipts",
            "amount": 0.001,
            "debit_account_id": bank,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("decimal places"), "{body}");
}

#[tokio::test]
async fn test_member_with_group_expand() {
    let app = router();
    let (status, group) = send(
        &app,
        Method::POST,
        "/api/v1/groups",
        Some(json!({ "group_name": "Choir" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = group["id"].as_str().unwrap();

    let (status, member) = send(
        &app,
        Method::POST,
        "/api/v1/members",
        Some(json!({
            "full_name": "Grace Wanjiru",
            "phone_number": "+254712345678",
            "group_id": group_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(member.get("group").is_none());
    let member_id = member["id"].as_str().unwrap();

    let (_, expanded) = send(
        &app,
        Method::GET,
        &format!("/api/v1/members/{member_id}?expand=true"),
        None,
    )
    .await;
    assert_eq!(expanded["group"]["group_name"], "Choir");

    let (_, count) = send(&app, Method::GET, &format!("/api/v1/groups/{group_id}/count"), None).await;
    assert_eq!(count["member_count"], 1);
    assert_eq!(count["group_id"], group_id);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/groups/{group_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, found) = send(&app, Method::GET, "/api/v1/members/search?q=grace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/v1/members/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_phone_is_rejected() {
    let app = router();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/members",
        Some(json!({ "full_name": "Ann", "phone_number": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transaction_and_receipt_totals() {
    let app = router();
    let bank = create_account(&app, "Bank", "Bank").await;
    let tithes = create_account(&app, "Tithes", "Income").await;

    let (status, tx) = send_as(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({
            "transaction_type": "receipts",
            "amount": 350,
            "debit_account_id": bank,
            "transaction_ref": "SUN-01",
        })),
        Some("clerk-2"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{tx}");
    assert_eq!(tx["created_by"], "clerk-2");
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({ "transaction_type": "receipts", "amount": 0, "debit_account_id": bank })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let total_uri = format!("/api/v1/receipts/account/{tithes}/total");
    let (_, body) = send(&app, Method::GET, &total_uri, None).await;
    assert_eq!(body["total"].as_f64(), Some(0.0));

    for amount in [100, 200, 50] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/receipts",
            Some(json!({ "transaction_id": tx_id, "income_account_id": tithes, "amount": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, &total_uri, None).await;
    assert_eq!(body["total"].as_f64(), Some(350.0));

    let (_, by_ref) = send(&app, Method::GET, "/api/v1/transactions/ref/SUN-01", None).await;
    assert_eq!(by_ref["id"], tx_id.as_str());

    let (_, expanded) = send(
        &app,
        Method::GET,
        &format!("/api/v1/transactions/{tx_id}?expand=true"),
        None,
    )
    .await;
    assert_eq!(expanded["debit_account"]["account_name"], "Bank");
}

#[tokio::test]
async fn test_date_range_requires_both_bounds() {
    let app = router();
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/transactions/date-range?start_date=2024-01-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/receipts/date-range?start_date=yesterday&end_date=today",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/transfers/date-range?start_date=2024-01-01T00:00:00Z&end_date=2024-12-31T23:59:59Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_authentication_flow() {
    let app = router();
    let (status, user) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "mary",
            "email": "mary@church.org",
            "password": "Offering2024",
            "full_name": "Mary Achieng",
            "role": "treasurer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password_hash").is_none());
    let user_id = user["id"].as_str().unwrap().to_string();

    let login = |username: &'static str, password: &'static str| {
        Some(json!({ "username": username, "password": password }))
    };

    let (status, body) = send(&app, Method::POST, "/api/v1/users/authenticate", login("mary", "Offering2024")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["last_login"].is_string());

    let (status, wrong) = send(&app, Method::POST, "/api/v1/users/authenticate", login("mary", "Nope12345")).await;
    let (_, unknown) = send(&app, Method::POST, "/api/v1/users/authenticate", login("ghost", "Nope12345")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);

    let (status, _) = send(&app, Method::POST, &format!("/api/v1/users/{user_id}/deactivate"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::POST, "/api/v1/users/authenticate", login("mary", "Offering2024")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::POST, "/api/v1/users/authenticate", login("mary", "Nope12345")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, active) = send(&app, Method::GET, "/api/v1/users/active", None).await;
    assert!(active.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_change_password_endpoint() {
    let app = router();
    let (_, user) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "john",
            "email": "john@church.org",
            "password": "Offering2024",
            "full_name": "John Kamau",
            "role": "clerk",
        })),
    )
    .await;
    let uri = format!("/api/v1/users/{}/change-password", user["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "old_password": "Wrong12345", "new_password": "Harvest2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "old_password": "Offering2024", "new_password": "Harvest2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully");
}
