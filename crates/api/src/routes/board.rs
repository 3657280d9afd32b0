//! Route definitions for Kanban boards.
//!
//! Board-scoped lists/cards nest under `/boards`; card mutation and movement
//! get top-level `/cards` routes (clients address cards directly when
//! dragging between lists).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::board;
use crate::state::AppState;

/// Routes mounted at `/boards`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /{id}                                -> get_by_id (lists + cards)
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete (cascades)
/// POST   /{board_id}/lists                    -> add_list
/// PUT    /{board_id}/lists/{id}               -> update_list
/// DELETE /{board_id}/lists/{id}               -> delete_list
/// POST   /{board_id}/lists/{list_id}/cards    -> add_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(board::list).post(board::create))
        .route(
            "/{id}",
            get(board::get_by_id)
                .put(board::update)
                .delete(board::delete),
        )
        .route("/{board_id}/lists", post(board::add_list))
        .route(
            "/{board_id}/lists/{id}",
            put(board::update_list).delete(board::delete_list),
        )
        .route("/{board_id}/lists/{list_id}/cards", post(board::add_card))
}

/// Routes mounted at `/cards`.
///
/// ```text
/// PUT    /{id}       -> update_card
/// DELETE /{id}       -> delete_card
/// POST   /{id}/move  -> move_card (target list + position)
/// ```
pub fn card_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(board::update_card).delete(board::delete_card))
        .route("/{id}/move", post(board::move_card))
}
