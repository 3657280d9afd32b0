//! Route definitions for file storage.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Routes mounted at `/storage`.
///
/// ```text
/// POST /upload -> upload (multipart, auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(storage::upload))
}

/// Public file serving, mounted at the server root.
///
/// ```text
/// GET /files/{user_id}/{name} -> serve_file
/// ```
pub fn files_router() -> Router<AppState> {
    Router::new().route("/files/{user_id}/{name}", get(storage::serve_file))
}
