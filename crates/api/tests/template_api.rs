//! HTTP-level integration tests for templates: CRUD, ownership scoping,
//! image cascade, and the plan ceiling.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, register_user};
use countersign_db::repositories::TemplateRepo;
use sqlx::PgPool;

async fn create_template(app: axum::Router, token: &str, name: &str) -> serde_json::Value {
    let body = serde_json::json!({ "name": name, "description": "desc" });
    let response = post_json_auth(app, "/api/v1/templates", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_crud(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "templates@example.com").await;

    let created = create_template(app.clone(), &token, "Pitch deck").await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["name"], "Pitch deck");

    let response = get_auth(app.clone(), &format!("/api/v1/templates/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({ "name": "Pitch deck v2" });
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/templates/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["name"], "Pitch deck v2");
    assert_eq!(updated["data"]["description"], "desc", "untouched field kept");

    let response = get_auth(app.clone(), "/api/v1/templates", &token).await;
    let listed = body_json(response).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &format!("/api/v1/templates/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/templates/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_templates_are_tenant_scoped(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register_user(app.clone(), "owner-t@example.com").await;
    let (intruder, _) = register_user(app.clone(), "intruder-t@example.com").await;

    let created = create_template(app.clone(), &owner, "Private").await;
    let id = created["data"]["id"].as_i64().unwrap();

    // Foreign reads, updates, and deletes all look like 404.
    let response = get_auth(app.clone(), &format!("/api/v1/templates/{id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = serde_json::json!({ "name": "Hijacked" });
    let response =
        put_json_auth(app.clone(), &format!("/api/v1/templates/{id}"), &intruder, body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/templates/{id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees the untouched row.
    let response = get_auth(app, &format!("/api/v1/templates/{id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Private");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deleting_template_cascades_images(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, _) = register_user(app.clone(), "cascade-t@example.com").await;

    let created = create_template(app.clone(), &token, "Illustrated").await;
    let id = created["data"]["id"].as_i64().unwrap();

    for i in 0..2 {
        let body = serde_json::json!({ "url": format!("http://files.example/{i}.png") });
        let response = post_json_auth(
            app.clone(),
            &format!("/api/v1/templates/{id}/images"),
            &token,
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(app.clone(), &format!("/api/v1/templates/{id}/images"), &token).await;
    let images = body_json(response).await;
    assert_eq!(images["data"].as_array().unwrap().len(), 2);

    let response = delete_auth(app, &format!("/api/v1/templates/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Image rows are gone with the template.
    let remaining = TemplateRepo::count_images(&pool, id).await.unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_plan_ceiling_blocks_creation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = register_user(app.clone(), "ceiling@example.com").await;

    // Free plan allows 3 templates.
    for i in 0..3 {
        create_template(app.clone(), &token, &format!("T{i}")).await;
    }

    let body = serde_json::json!({ "name": "One too many" });
    let response = post_json_auth(app.clone(), "/api/v1/templates", &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Usage endpoint reflects the counters.
    let response = get_auth(app.clone(), "/api/v1/users/me/usage", &token).await;
    let usage = body_json(response).await;
    assert_eq!(usage["data"]["used"]["templates"], 3);
    assert_eq!(usage["data"]["limits"]["templates"], 3);

    // Deleting one frees a slot.
    let response = get_auth(app.clone(), "/api/v1/templates", &token).await;
    let listed = body_json(response).await;
    let id = listed["data"][0]["id"].as_i64().unwrap();
    let response = delete_auth(app.clone(), &format!("/api/v1/templates/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "name": "Fits again" });
    let response = post_json_auth(app, "/api/v1/templates", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
