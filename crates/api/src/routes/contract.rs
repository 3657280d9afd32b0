//! Route definitions for the owner-facing `/contracts` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                                -> list
/// POST   /                                -> create
/// GET    /{id}                            -> get_by_id (with signatories)
/// PUT    /{id}                            -> update (draft only)
/// DELETE /{id}                            -> delete (cascades signatories)
/// POST   /{id}/send                       -> send (draft -> sent)
/// POST   /{id}/signatories                -> add_signatory (draft only)
/// DELETE /{id}/signatories/{signatory_id} -> remove_signatory (draft only)
/// GET    /{id}/certificate                -> certificate (signed PDF download)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list).post(contract::create))
        .route(
            "/{id}",
            get(contract::get_by_id)
                .put(contract::update)
                .delete(contract::delete),
        )
        .route("/{id}/send", post(contract::send))
        .route("/{id}/signatories", post(contract::add_signatory))
        .route(
            "/{id}/signatories/{signatory_id}",
            delete(contract::remove_signatory),
        )
        .route("/{id}/certificate", get(contract::certificate))
}
