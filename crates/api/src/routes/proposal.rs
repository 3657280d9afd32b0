//! Route definitions for the owner-facing `/proposals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::proposal;
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// POST   /{id}/send   -> send (draft -> sent, issues share token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(proposal::list).post(proposal::create))
        .route(
            "/{id}",
            get(proposal::get_by_id)
                .put(proposal::update)
                .delete(proposal::delete),
        )
        .route("/{id}/send", post(proposal::send))
}
