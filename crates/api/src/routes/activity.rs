//! Route definition for the `/activity` feed.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// ```text
/// GET / -> list (?limit=&offset=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(activity::list))
}
