//! File storage handlers: authenticated multipart upload and public serving
//! of stored blobs.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use countersign_core::types::DbId;
use serde::Serialize;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage;

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub name: String,
    pub size: usize,
}

/// POST /api/v1/storage/upload
///
/// Multipart upload (`file` field). Accepts pdf/png/jpg/jpeg/webp up to the
/// configured size cap; returns the public URL of the stored blob.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResponse>>)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("Expected a 'file' field".into()))?;

    if field.name() != Some("file") {
        return Err(AppError::BadRequest("Expected a 'file' field".into()));
    }

    let filename = field
        .file_name()
        .ok_or_else(|| AppError::BadRequest("Uploaded file needs a filename".into()))?
        .to_string();
    let ext = storage::validate_extension(&filename).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unsupported file type. Allowed: {}",
            storage::ALLOWED_EXTENSIONS.join(", ")
        ))
    })?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_upload_bytes
        )));
    }

    let name = storage::stored_name(&ext);
    storage::save(&state.config, auth.user_id, &name, &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let url = storage::public_url(&state.config, auth.user_id, &name);
    tracing::info!(user_id = auth.user_id, name = %name, size = bytes.len(), "File uploaded");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::UPLOAD,
        "file",
        None,
        Some(&name),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResponse {
                url,
                name,
                size: bytes.len(),
            },
        }),
    ))
}

/// GET /files/{user_id}/{name}
///
/// Serve a stored blob. No auth: names are server-generated UUIDs, so the
/// URL itself is the capability. Traversal attempts and unknown names read
/// as 404.
pub async fn serve_file(
    State(state): State<AppState>,
    Path((user_id, name)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let path = storage::resolve_path(&state.config, user_id, &name)
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("File not found".into()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, storage::content_type_for(&name))],
        bytes,
    ))
}
