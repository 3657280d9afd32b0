//! Liveness and readiness handlers.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Static liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health/ready
///
/// Readiness probe: pings the database.
pub async fn ready(State(state): State<AppState>) -> AppResult<Json<Value>> {
    countersign_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ready" })))
}
