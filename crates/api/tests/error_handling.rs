//! Cross-cutting error-policy tests: auth enforcement, webhook signature
//! verification, file-serving hygiene, and the health endpoints.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth};
use countersign_core::webhook;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_routes_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/templates",
        "/api/v1/proposals",
        "/api/v1/contracts",
        "/api/v1/clients",
        "/api/v1/boards",
        "/api/v1/activity",
        "/api/v1/users/me",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_bearer_token_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/templates", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_error_body_shape(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_endpoints(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_file_reads_as_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/files/999/nope.pdf").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Traversal attempts are indistinguishable from missing files.
    let response = get(app, "/files/1/..%2F..%2Fetc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Payment webhook stub
// ---------------------------------------------------------------------------

async fn post_webhook(app: axum::Router, body: &[u8], signature: Option<&str>) -> StatusCode {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payments")
        .header(CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-payment-signature", signature);
    }
    let request = builder.body(Body::from(body.to_vec())).unwrap();
    app.oneshot(request).await.unwrap().status()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_accepts_signed_delivery(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = br#"{"type":"invoice.paid","id":"evt_123"}"#;
    let signature = webhook::sign(common::WEBHOOK_SECRET, body);

    let status = post_webhook(app, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_rejects_bad_or_missing_signature(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = br#"{"type":"invoice.paid"}"#;

    let status = post_webhook(app.clone(), body, Some("deadbeef")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let status = post_webhook(app, body, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_webhook_acknowledges_unknown_event_types(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = br#"{"type":"subscription.totally_new_event"}"#;
    let signature = webhook::sign(common::WEBHOOK_SECRET, body);

    let status = post_webhook(app, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
}
