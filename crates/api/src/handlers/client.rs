//! Handlers for the `/clients` resource (CRM).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::plan::UsageCounter;
use countersign_core::types::DbId;
use countersign_db::models::client::{Client, CreateClient, UpdateClient};
use countersign_db::repositories::ClientRepo;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::quota::{begin_with_quota, release_quota};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// POST /api/v1/clients
///
/// Create a client; counts against the plan's client ceiling.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let mut tx = begin_with_quota(&state, auth.user_id, UsageCounter::Clients).await?;
    let client = ClientRepo::create(&mut *tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, user_id = auth.user_id, "Client created");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::CREATE,
        "client",
        Some(client.id),
        Some(&client.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = ClientRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Proposals and contracts that referenced this client keep their rows.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = ClientRepo::delete(&mut *tx, auth.user_id, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    release_quota(&mut tx, auth.user_id, UsageCounter::Clients).await?;
    tx.commit().await?;

    tracing::info!(client_id = id, user_id = auth.user_id, "Client deleted");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DELETE,
        "client",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
