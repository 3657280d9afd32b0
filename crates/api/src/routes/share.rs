//! Route definitions for the public (token-addressed) share surface.
//!
//! Nothing here uses the `AuthUser` extractor: possession of the token is
//! the credential.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::share;
use crate::state::AppState;

/// Routes mounted at `/share`.
///
/// ```text
/// GET  /proposals/{token}          -> view_proposal (tracks views)
/// POST /proposals/{token}/accept   -> accept_proposal
/// POST /proposals/{token}/decline  -> decline_proposal
/// GET  /contracts/{token}          -> view_contract (signing page data)
/// POST /contracts/{token}/sign     -> sign_contract
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/proposals/{token}", get(share::view_proposal))
        .route("/proposals/{token}/accept", post(share::accept_proposal))
        .route("/proposals/{token}/decline", post(share::decline_proposal))
        .route("/contracts/{token}", get(share::view_contract))
        .route("/contracts/{token}/sign", post(share::sign_contract))
}
