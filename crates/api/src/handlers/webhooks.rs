//! Receiver stub for payment-provider webhooks.
//!
//! Deliveries are signature-verified and acknowledged, but intentionally
//! have no side effects: billing state is not wired to the provider yet.
//! Keeping the endpoint live means the provider's retry queue stays empty
//! and deliveries are visible in the logs.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::webhook;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the provider's HMAC-SHA256 hex signature of the body.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// POST /api/v1/webhooks/payments
///
/// Verify the signature (when a secret is configured), log the event, and
/// acknowledge. Unknown event types are acknowledged too.
pub async fn payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Value>> {
    if let Some(secret) = state.config.payments_webhook_secret.as_deref() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing webhook signature".into()))
            })?;

        if !webhook::verify(secret, &body, signature) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid webhook signature".into(),
            )));
        }
    }

    let event_type = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(event_type = %event_type, size = body.len(), "Payment webhook received (no-op)");

    Ok(Json(json!({ "received": true })))
}
