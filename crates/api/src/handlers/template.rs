//! Handlers for the `/templates` resource and its image attachments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::plan::UsageCounter;
use countersign_core::types::DbId;
use countersign_db::models::template::{
    CreateTemplate, CreateTemplateImage, Template, TemplateImage, UpdateTemplate,
};
use countersign_db::repositories::TemplateRepo;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::quota::{begin_with_quota, release_quota};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Template",
        id,
    })
}

/// POST /api/v1/templates
///
/// Create a template; counts against the plan's template ceiling.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let mut tx = begin_with_quota(&state, auth.user_id, UsageCounter::Templates).await?;
    let template = TemplateRepo::create(&mut *tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(template_id = template.id, user_id = auth.user_id, "Template created");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::CREATE,
        "template",
        Some(template.id),
        Some(&template.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let templates = TemplateRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Template>>> {
    let template = TemplateRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/templates/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<Template>>> {
    let template = TemplateRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(template_id = id, user_id = auth.user_id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/templates/{id}
///
/// Deletes the template and its image rows, and frees a plan slot, in one
/// transaction.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = TemplateRepo::delete(&mut *tx, auth.user_id, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    release_quota(&mut tx, auth.user_id, UsageCounter::Templates).await?;
    tx.commit().await?;

    tracing::info!(template_id = id, user_id = auth.user_id, "Template deleted");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DELETE,
        "template",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// GET /api/v1/templates/{id}/images
pub async fn list_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TemplateImage>>>> {
    // Distinguish "no images" from "no such template".
    TemplateRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let images = TemplateRepo::list_images(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/templates/{id}/images
pub async fn add_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTemplateImage>,
) -> AppResult<(StatusCode, Json<DataResponse<TemplateImage>>)> {
    if input.url.trim().is_empty() {
        return Err(AppError::BadRequest("url must not be empty".into()));
    }

    let image = TemplateRepo::add_image(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// DELETE /api/v1/templates/{id}/images/{image_id}
pub async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, image_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = TemplateRepo::delete_image(&state.pool, auth.user_id, id, image_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TemplateImage",
            id: image_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
