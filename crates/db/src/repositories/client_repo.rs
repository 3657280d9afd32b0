//! Repository for the `clients` table.

use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::client::{Client, CreateClient, UpdateClient};

const COLUMNS: &str = "id, user_id, name, email, company, phone, notes, created_at, updated_at";

pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client. Run inside the transaction that bumped the usage
    /// counter.
    pub async fn create<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (user_id, name, email, company, phone, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_one(ex)
            .await
    }

    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Client>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clients WHERE user_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                company = COALESCE($5, company),
                phone = COALESCE($6, phone),
                notes = COALESCE($7, notes),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client. Proposals and contracts that referenced it keep
    /// their rows (`ON DELETE SET NULL`). Run inside the transaction that
    /// decrements the usage counter.
    pub async fn delete<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(ex)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
