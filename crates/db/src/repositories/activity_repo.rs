//! Repository for the append-only `activity_log` table.

use countersign_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::Activity;

const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, detail, created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        entity_type: &str,
        entity_id: Option<DbId>,
        detail: Option<&str>,
    ) -> Result<Activity, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log (user_id, action, entity_type, entity_id, detail)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(user_id)
            .bind(action)
            .bind(entity_type)
            .bind(entity_id)
            .bind(detail)
            .fetch_one(pool)
            .await
    }

    /// Newest entries first, with limit/offset pagination.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Activity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Activity>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
