//! Activity feed entry model.

use countersign_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An append-only activity row from the `activity_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub detail: Option<String>,
    pub created_at: Timestamp,
}
