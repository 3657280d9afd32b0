//! Repository for the `signatories` table.

use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::contract::{CreateSignatory, Signatory};

const COLUMNS: &str = "id, contract_id, name, email, signing_token, signed, signature_url, \
     viewed_at, signed_at, ip_address, user_agent, position, created_at";

pub struct SignatoryRepo;

impl SignatoryRepo {
    /// Add a signatory to a contract the caller has already verified is an
    /// owned draft. The signing token is generated by the caller.
    pub async fn add(
        pool: &PgPool,
        contract_id: DbId,
        input: &CreateSignatory,
        signing_token: &str,
    ) -> Result<Signatory, sqlx::Error> {
        let query = format!(
            "INSERT INTO signatories (contract_id, name, email, signing_token, position)
             VALUES ($1, $2, $3, $4,
                     COALESCE($5, (SELECT COALESCE(MAX(position) + 1, 0)
                                   FROM signatories WHERE contract_id = $1)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Signatory>(&query)
            .bind(contract_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(signing_token)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_contract(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<Vec<Signatory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM signatories WHERE contract_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Signatory>(&query)
            .bind(contract_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a signatory, validating ownership through the parent contract
    /// and only while the contract is still a draft.
    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        contract_id: DbId,
        signatory_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM signatories s
             USING contracts c
             WHERE s.id = $1 AND s.contract_id = $2
               AND c.id = s.contract_id AND c.user_id = $3 AND c.status = 'draft'",
        )
        .bind(signatory_id)
        .bind(contract_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Signatory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM signatories WHERE signing_token = $1");
        sqlx::query_as::<_, Signatory>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `viewed_at` the first time a signer opens their link.
    pub async fn mark_viewed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE signatories SET viewed_at = COALESCE(viewed_at, NOW()) WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a signature. Guarded on `signed = FALSE`, so a double-submit
    /// from the same signer loses the race. Run inside the signing
    /// transaction.
    pub async fn sign<'e>(
        ex: impl PgExecutor<'e>,
        id: DbId,
        signature_url: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<Option<Signatory>, sqlx::Error> {
        let query = format!(
            "UPDATE signatories
             SET signed = TRUE, signature_url = $2, signed_at = NOW(),
                 ip_address = $3, user_agent = $4
             WHERE id = $1 AND signed = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Signatory>(&query)
            .bind(id)
            .bind(signature_url)
            .bind(ip_address)
            .bind(user_agent)
            .fetch_optional(ex)
            .await
    }

    pub async fn count_for_contract(
        pool: &PgPool,
        contract_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM signatories WHERE contract_id = $1")
                .bind(contract_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
