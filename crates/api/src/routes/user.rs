//! Route definitions for `/users/me`.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users/me`.
///
/// ```text
/// GET /        -> get_profile
/// PUT /        -> update_profile
/// GET /usage   -> usage (plan, ceilings, counters)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::get_profile).put(user::update_profile))
        .route("/usage", get(user::usage))
}
