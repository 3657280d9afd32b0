//! Handler for the `/activity` feed.

use axum::extract::{Query, State};
use axum::Json;
use countersign_db::models::activity::Activity;
use countersign_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/activity
///
/// The user's activity feed, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Activity>>>> {
    let entries = ActivityRepo::list(
        &state.pool,
        auth.user_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}
