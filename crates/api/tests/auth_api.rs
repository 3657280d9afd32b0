//! HTTP-level integration tests for registration, login, token refresh,
//! logout, and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, register_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_returns_tokens_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "ada@example.com",
        "password": "longenoughpassword",
        "full_name": "Ada Lovelace",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["full_name"], "Ada Lovelace");
    assert_eq!(json["user"]["plan"], "free", "new accounts start on free");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "dup@example.com").await;

    let body = serde_json::json!({
        "email": "dup@example.com",
        "password": "longenoughpassword",
        "full_name": "Second",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_weak_password_and_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let weak = serde_json::json!({
        "email": "ok@example.com",
        "password": "short",
        "full_name": "X",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", weak).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bad_email = serde_json::json!({
        "email": "not-an-email",
        "password": "longenoughpassword",
        "full_name": "X",
    });
    let response = post_json(app, "/api/v1/auth/register", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success_and_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "login@example.com").await;

    let body = serde_json::json!({
        "email": "login@example.com",
        "password": "integration-password-1",
    });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap();

    let me = get_auth(app, "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me_json = body_json(me).await;
    assert_eq!(me_json["email"], "login@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "wrongpw@example.com").await;

    let body = serde_json::json!({
        "email": "wrongpw@example.com",
        "password": "not-the-password",
    });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent_user_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": "whatever123" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "lockout@example.com").await;

    for _ in 0..5 {
        let body = serde_json::json!({
            "email": "lockout@example.com",
            "password": "definitely-wrong",
        });
        let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Correct password, but the account is now temporarily locked.
    let body = serde_json::json!({
        "email": "lockout@example.com",
        "password": "integration-password-1",
    });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "rotate@example.com",
        "password": "integration-password-1",
        "full_name": "Rotator",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    let json = body_json(response).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    // First exchange succeeds and returns a new refresh token.
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"].as_str().unwrap(), refresh_token);

    // The consumed token is revoked; replaying it fails.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "logout@example.com",
        "password": "integration-password-1",
        "full_name": "Leaver",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    let json = body_json(response).await;
    let access_token = json["access_token"].as_str().unwrap().to_string();
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let response = common::post_auth(app.clone(), "/api/v1/auth/logout", &access_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Refresh tokens die with the sessions.
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
