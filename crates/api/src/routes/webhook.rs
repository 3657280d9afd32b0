//! Route definition for inbound payment webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /payments -> payments (HMAC-verified, acknowledged, no-op)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(webhooks::payments))
}
