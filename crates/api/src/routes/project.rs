//! Route definitions for the `/projects` resource.
//!
//! Also nests task routes under `/projects/{project_id}/tasks`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (cascades tasks)
///
/// GET    /{project_id}/tasks        -> list
/// POST   /{project_id}/tasks        -> create
/// PUT    /{project_id}/tasks/{id}   -> update
/// DELETE /{project_id}/tasks/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    let task_routes = Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/{id}", axum::routing::put(task::update).delete(task::delete));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/tasks", task_routes)
}
