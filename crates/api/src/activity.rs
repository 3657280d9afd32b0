//! Best-effort activity feed recorder.
//!
//! Mutating handlers call [`record`] after a successful write. A failed
//! insert must never fail the request that triggered it; failures are logged
//! and dropped.

use countersign_core::types::DbId;
use countersign_db::repositories::ActivityRepo;
use countersign_db::DbPool;

/// Known action names for activity entries.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const SEND: &str = "send";
    pub const ACCEPT: &str = "accept";
    pub const DECLINE: &str = "decline";
    pub const SIGN: &str = "sign";
    pub const UPLOAD: &str = "upload";
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
}

/// Append one activity entry for the user's feed. Best-effort.
pub async fn record(
    pool: &DbPool,
    user_id: DbId,
    action: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
    detail: Option<&str>,
) {
    if let Err(err) =
        ActivityRepo::insert(pool, user_id, action, entity_type, entity_id, detail).await
    {
        tracing::warn!(
            error = %err,
            user_id,
            action,
            entity_type,
            "Failed to record activity entry",
        );
    }
}
