//! HTTP-level integration tests for Kanban boards: nested ownership via the
//! parent board, card movement, and the board plan ceiling.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, register_user};
use sqlx::PgPool;

async fn create_board(app: axum::Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(app, "/api/v1/boards", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_list(app: axum::Router, token: &str, board_id: i64, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name });
    let response =
        post_json_auth(app, &format!("/api/v1/boards/{board_id}/lists"), token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_card(app: axum::Router, token: &str, board_id: i64, list_id: i64) -> i64 {
    let body = serde_json::json!({ "title": "Write copy" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/boards/{board_id}/lists/{list_id}/cards"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_view_includes_lists_and_cards(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "kanban@example.com").await;

    let board_id = create_board(app.clone(), &token, "Launch plan").await;
    let todo = create_list(app.clone(), &token, board_id, "Todo").await;
    let doing = create_list(app.clone(), &token, board_id, "Doing").await;
    create_card(app.clone(), &token, board_id, todo).await;

    let response = get_auth(app, &format!("/api/v1/boards/{board_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    let lists = view["data"]["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0]["id"].as_i64().unwrap(), todo);
    assert_eq!(lists[0]["cards"].as_array().unwrap().len(), 1);
    assert_eq!(lists[1]["id"].as_i64().unwrap(), doing);
    assert_eq!(lists[1]["cards"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_move_card_between_lists(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "mover@example.com").await;

    let board_id = create_board(app.clone(), &token, "Board").await;
    let todo = create_list(app.clone(), &token, board_id, "Todo").await;
    let done = create_list(app.clone(), &token, board_id, "Done").await;
    let card_id = create_card(app.clone(), &token, board_id, todo).await;

    let body = serde_json::json!({ "list_id": done, "position": 0 });
    let response = post_json_auth(app.clone(), &format!("/api/v1/cards/{card_id}/move"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let moved = body_json(response).await;
    assert_eq!(moved["data"]["list_id"].as_i64().unwrap(), done);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_kanban_ownership_is_checked_through_the_board(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register_user(app.clone(), "owner-k@example.com").await;
    let (intruder, _) = register_user(app.clone(), "intruder-k@example.com").await;

    let board_id = create_board(app.clone(), &owner, "Private board").await;
    let list_id = create_list(app.clone(), &owner, board_id, "Todo").await;
    let card_id = create_card(app.clone(), &owner, board_id, list_id).await;

    // A foreign user cannot add lists to the board...
    let body = serde_json::json!({ "name": "Sneaky list" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/lists"),
        &intruder,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // ...nor add cards to its lists...
    let body = serde_json::json!({ "title": "Sneaky card" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/lists/{list_id}/cards"),
        &intruder,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // ...nor move or delete its cards.
    let body = serde_json::json!({ "list_id": list_id, "position": 1 });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/cards/{card_id}/move"),
        &intruder,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::delete_auth(app.clone(), &format!("/api/v1/cards/{card_id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A card cannot be moved onto a foreign user's list either.
    let foreign_board = create_board(app.clone(), &intruder, "Their board").await;
    let foreign_list = create_list(app.clone(), &intruder, foreign_board, "Their list").await;
    let body = serde_json::json!({ "list_id": foreign_list, "position": 0 });
    let response =
        post_json_auth(app, &format!("/api/v1/cards/{card_id}/move"), &owner, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_plan_ceiling(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "boardcap@example.com").await;

    // Free plan allows a single board.
    create_board(app.clone(), &token, "Only board").await;

    let body = serde_json::json!({ "name": "Second board" });
    let response = post_json_auth(app, "/api/v1/boards", &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
