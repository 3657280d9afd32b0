//! Root-level health routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Routes mounted at the server root (not under `/api/v1`).
///
/// ```text
/// GET /health        -> liveness
/// GET /health/ready  -> readiness (database ping)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
}
