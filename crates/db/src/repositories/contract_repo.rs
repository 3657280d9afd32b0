//! Repository for the `contracts` table.
//!
//! Same compare-and-swap discipline as proposals: `draft -> sent -> signed`,
//! with the final transition additionally guarded on "no unsigned
//! signatories remain".

use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::contract::{Contract, CreateContract, UpdateContract};

const COLUMNS: &str = "id, user_id, client_id, title, file_url, status, sent_at, signed_at, \
     created_at, updated_at";

pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new draft. Run inside the transaction that bumped the usage
    /// counter.
    pub async fn create<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (user_id, client_id, title, file_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(user_id)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(&input.file_url)
            .fetch_one(ex)
            .await
    }

    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update content fields while the contract is still a draft. Sent and
    /// signed documents are immutable.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                title = COALESCE($3, title),
                client_id = COALESCE($4, client_id),
                file_url = COALESCE($5, file_url),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.client_id)
            .bind(&input.file_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contract; signatories cascade. Run inside the transaction
    /// that decrements the usage counter.
    pub async fn delete<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(ex)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lifecycle (compare-and-swap)
    // -----------------------------------------------------------------------

    /// `draft -> sent`. The handler has already checked the contract has a
    /// source file and at least one signatory.
    pub async fn mark_sent(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts
             SET status = 'sent', sent_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// `sent -> signed`, but only once every signatory has signed. The
    /// NOT EXISTS guard runs in the same statement, so two concurrent final
    /// signatures cannot both complete the contract.
    pub async fn mark_signed_if_complete<'e>(
        ex: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts c
             SET status = 'signed', signed_at = NOW(), updated_at = NOW()
             WHERE c.id = $1 AND c.status = 'sent'
               AND NOT EXISTS (
                   SELECT 1 FROM signatories s
                   WHERE s.contract_id = c.id AND s.signed = FALSE
               )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(ex)
            .await
    }

    /// Fetch the contract addressed by a signatory's signing token.
    pub async fn find_by_signing_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT c.{cols} FROM contracts c
             JOIN signatories s ON s.contract_id = c.id
             WHERE s.signing_token = $1",
            cols = COLUMNS.replace(", ", ", c.")
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }
}
