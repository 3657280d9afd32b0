//! Route definitions for the `/integrations/ads` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::ads;
use crate::state::AppState;

/// Routes mounted at `/integrations/ads`.
///
/// ```text
/// GET    /connect            -> connect (build provider redirect URL)
/// GET    /callback           -> callback (public; state-token addressed)
/// GET    /status             -> status
/// DELETE /                   -> disconnect
/// GET    /snapshots          -> list_snapshots (?from=&to=)
/// POST   /snapshots/refresh  -> refresh_snapshots (pull from provider)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(ads::disconnect))
        .route("/connect", get(ads::connect))
        .route("/callback", get(ads::callback))
        .route("/status", get(ads::status))
        .route("/snapshots", get(ads::list_snapshots))
        .route("/snapshots/refresh", post(ads::refresh_snapshots))
}
