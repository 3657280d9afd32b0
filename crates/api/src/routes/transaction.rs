//! Route definitions for the `/transactions` finance ledger.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::transaction;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// GET    /         -> list (?from=&to=)
/// POST   /         -> create
/// GET    /summary  -> summary (?from=&to=)
/// PUT    /{id}     -> update
/// DELETE /{id}     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transaction::list).post(transaction::create))
        .route("/summary", get(transaction::summary))
        .route("/{id}", put(transaction::update).delete(transaction::delete))
}
