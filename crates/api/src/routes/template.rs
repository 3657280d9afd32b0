//! Route definitions for the `/templates` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::template;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete (cascades images)
/// GET    /{id}/images             -> list_images
/// POST   /{id}/images             -> add_image
/// DELETE /{id}/images/{image_id}  -> delete_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template::list).post(template::create))
        .route(
            "/{id}",
            get(template::get_by_id)
                .put(template::update)
                .delete(template::delete),
        )
        .route(
            "/{id}/images",
            get(template::list_images).post(template::add_image),
        )
        .route("/{id}/images/{image_id}", delete(template::delete_image))
}
