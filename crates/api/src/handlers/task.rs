//! Handlers for tasks nested under `/projects/{project_id}/tasks`.
//!
//! Ownership is validated through the parent project on every statement; a
//! foreign project reads as 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::types::DbId;
use countersign_db::models::task::{CreateTask, Task, UpdateTask};
use countersign_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let task = TaskRepo::create(&state.pool, auth.user_id, project_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/projects/{project_id}/tasks
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let tasks = TaskRepo::list_for_project(&state.pool, auth.user_id, project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// PUT /api/v1/projects/{project_id}/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = TaskRepo::update(&state.pool, auth.user_id, project_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id,
        }))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/projects/{project_id}/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = TaskRepo::delete(&state.pool, auth.user_id, project_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
