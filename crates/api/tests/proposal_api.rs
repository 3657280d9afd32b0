//! HTTP-level integration tests for the proposal lifecycle: send, public
//! share view with tracking, guarded accept/decline, and lazy expiry.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_empty, post_json_auth, register_user};
use sqlx::PgPool;

async fn create_proposal(
    app: axum::Router,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/proposals", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Create a draft and send it; returns `(proposal_id, share_token)`.
async fn sent_proposal(app: axum::Router, token: &str) -> (i64, String) {
    let created = create_proposal(
        app.clone(),
        token,
        serde_json::json!({ "title": "Website redesign", "amount_cents": 450_000 }),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "draft");
    assert!(created["data"]["share_token"].is_null(), "drafts have no link");

    let response = post_auth(app, &format!("/api/v1/proposals/{id}/send"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let sent = body_json(response).await;
    assert_eq!(sent["data"]["status"], "sent");
    let share_token = sent["data"]["share_token"].as_str().unwrap().to_string();
    (id, share_token)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_send_then_view_tracks_status_and_count(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "send@example.com").await;
    let (id, share) = sent_proposal(app.clone(), &token).await;

    // First public view: sent -> viewed, count 1.
    let response = get(app.clone(), &format!("/api/v1/share/proposals/{share}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let viewed = body_json(response).await;
    assert_eq!(viewed["data"]["status"], "viewed");
    assert_eq!(viewed["data"]["title"], "Website redesign");

    // Second view bumps the counter but keeps the status.
    let response = get(app.clone(), &format!("/api/v1/share/proposals/{share}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &format!("/api/v1/proposals/{id}"), &token).await;
    let owner_view = body_json(response).await;
    assert_eq!(owner_view["data"]["status"], "viewed");
    assert_eq!(owner_view["data"]["view_count"], 2);
    assert!(owner_view["data"]["viewed_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_resending_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "resend@example.com").await;
    let (id, _) = sent_proposal(app.clone(), &token).await;

    let response = post_auth(app, &format!("/api/v1/proposals/{id}/send"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_accept_is_guarded_against_reentry(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "accept@example.com").await;
    let (id, share) = sent_proposal(app.clone(), &token).await;

    let response = post_empty(app.clone(), &format!("/api/v1/share/proposals/{share}/accept")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let accepted = body_json(response).await;
    assert_eq!(accepted["data"]["status"], "accepted");

    // Double-accept: rejected, not double-processed.
    let response = post_empty(app.clone(), &format!("/api/v1/share/proposals/{share}/accept")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Declining after acceptance is rejected too.
    let response =
        post_empty(app.clone(), &format!("/api/v1/share/proposals/{share}/decline")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(app, &format!("/api/v1/proposals/{id}"), &token).await;
    let owner_view = body_json(response).await;
    assert_eq!(owner_view["data"]["status"], "accepted");
    assert!(owner_view["data"]["responded_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decline_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "decline@example.com").await;
    let (_, share) = sent_proposal(app.clone(), &token).await;

    let response = post_empty(app.clone(), &format!("/api/v1/share/proposals/{share}/decline")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let declined = body_json(response).await;
    assert_eq!(declined["data"]["status"], "declined");

    let response = post_empty(app, &format!("/api/v1/share/proposals/{share}/accept")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_share_link_is_gone(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "expiry@example.com").await;

    let created = create_proposal(
        app.clone(),
        &token,
        serde_json::json!({
            "title": "Stale offer",
            "valid_until": "2020-01-01T00:00:00Z",
        }),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_auth(app.clone(), &format!("/api/v1/proposals/{id}/send"), &token).await;
    let sent = body_json(response).await;
    let share = sent["data"]["share_token"].as_str().unwrap().to_string();

    // Both viewing and accepting read as 410 Gone.
    let response = get(app.clone(), &format!("/api/v1/share/proposals/{share}")).await;
    assert_eq!(response.status(), StatusCode::GONE);

    let response = post_empty(app.clone(), &format!("/api/v1/share/proposals/{share}/accept")).await;
    assert_eq!(response.status(), StatusCode::GONE);

    // The owner sees the lazily-flipped status.
    let response = get_auth(app, &format!("/api/v1/proposals/{id}"), &token).await;
    let owner_view = body_json(response).await;
    assert_eq!(owner_view["data"]["status"], "expired");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_share_token_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/share/proposals/doesnotexist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
