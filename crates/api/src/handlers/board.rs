//! Handlers for Kanban boards, lists, and cards.
//!
//! Lists and cards are validated through the parent board's owner (join in
//! the repository); foreign ids read as 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::plan::UsageCounter;
use countersign_core::types::DbId;
use countersign_db::models::board::{
    Board, BoardCard, BoardList, BoardView, CreateBoard, CreateBoardCard, CreateBoardList,
    MoveCard, UpdateBoard, UpdateBoardCard, UpdateBoardList,
};
use countersign_db::repositories::BoardRepo;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::quota::{begin_with_quota, release_quota};
use crate::response::DataResponse;
use crate::state::AppState;

fn board_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Board",
        id,
    })
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// POST /api/v1/boards
///
/// Create a board; counts against the plan's board ceiling.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBoard>,
) -> AppResult<(StatusCode, Json<DataResponse<Board>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let mut tx = begin_with_quota(&state, auth.user_id, UsageCounter::Boards).await?;
    let board = BoardRepo::create(&mut *tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(board_id = board.id, user_id = auth.user_id, "Board created");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::CREATE,
        "board",
        Some(board.id),
        Some(&board.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: board })))
}

/// GET /api/v1/boards
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Board>>>> {
    let boards = BoardRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: boards }))
}

/// GET /api/v1/boards/{id}
///
/// Full view: the board with position-ordered lists and cards.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BoardView>>> {
    let view = BoardRepo::view(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| board_not_found(id))?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/boards/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBoard>,
) -> AppResult<Json<DataResponse<Board>>> {
    let board = BoardRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| board_not_found(id))?;
    Ok(Json(DataResponse { data: board }))
}

/// DELETE /api/v1/boards/{id}
///
/// Lists and cards cascade with the board.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = BoardRepo::delete(&mut *tx, auth.user_id, id).await?;
    if !deleted {
        return Err(board_not_found(id));
    }
    release_quota(&mut tx, auth.user_id, UsageCounter::Boards).await?;
    tx.commit().await?;

    tracing::info!(board_id = id, user_id = auth.user_id, "Board deleted");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DELETE,
        "board",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// POST /api/v1/boards/{board_id}/lists
pub async fn add_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(board_id): Path<DbId>,
    Json(input): Json<CreateBoardList>,
) -> AppResult<(StatusCode, Json<DataResponse<BoardList>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let list = BoardRepo::add_list(&state.pool, auth.user_id, board_id, &input)
        .await?
        .ok_or_else(|| board_not_found(board_id))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// PUT /api/v1/boards/{board_id}/lists/{id}
pub async fn update_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((board_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateBoardList>,
) -> AppResult<Json<DataResponse<BoardList>>> {
    let list = BoardRepo::update_list(&state.pool, auth.user_id, board_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardList",
            id,
        }))?;
    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/boards/{board_id}/lists/{id}
pub async fn delete_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((board_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = BoardRepo::delete_list(&state.pool, auth.user_id, board_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "BoardList",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// POST /api/v1/boards/{board_id}/lists/{list_id}/cards
pub async fn add_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((board_id, list_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateBoardCard>,
) -> AppResult<(StatusCode, Json<DataResponse<BoardCard>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let card = BoardRepo::add_card(&state.pool, auth.user_id, board_id, list_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardList",
            id: list_id,
        }))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: card })))
}

/// PUT /api/v1/cards/{id}
pub async fn update_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBoardCard>,
) -> AppResult<Json<DataResponse<BoardCard>>> {
    let card = BoardRepo::update_card(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardCard",
            id,
        }))?;
    Ok(Json(DataResponse { data: card }))
}

/// DELETE /api/v1/cards/{id}
pub async fn delete_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BoardRepo::delete_card(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "BoardCard",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cards/{id}/move
///
/// Move a card to another list (and position). The target list must belong
/// to a board owned by the caller; anything else reads as 404.
pub async fn move_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveCard>,
) -> AppResult<Json<DataResponse<BoardCard>>> {
    let card = BoardRepo::move_card(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardCard",
            id,
        }))?;

    tracing::info!(card_id = id, list_id = input.list_id, user_id = auth.user_id, "Card moved");

    Ok(Json(DataResponse { data: card }))
}
