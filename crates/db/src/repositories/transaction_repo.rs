//! Repository for the `transactions` table (finance ledger).

use chrono::NaiveDate;
use countersign_core::types::DbId;
use sqlx::PgPool;

use crate::models::transaction::{
    CreateTransaction, Transaction, TransactionSummary, UpdateTransaction,
};

const COLUMNS: &str = "id, user_id, kind, amount_cents, category, note, occurred_on, created_at";

pub struct TransactionRepo;

impl TransactionRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (user_id, kind, amount_cents, category, note, occurred_on)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(&input.kind)
            .bind(input.amount_cents)
            .bind(&input.category)
            .bind(&input.note)
            .bind(input.occurred_on)
            .fetch_one(pool)
            .await
    }

    /// List a user's transactions, newest date first, optionally bounded by
    /// an inclusive date range.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE user_id = $1
               AND ($2::date IS NULL OR occurred_on >= $2)
               AND ($3::date IS NULL OR occurred_on <= $3)
             ORDER BY occurred_on DESC, id DESC"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateTransaction,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "UPDATE transactions SET
                kind = COALESCE($3, kind),
                amount_cents = COALESCE($4, amount_cents),
                category = COALESCE($5, category),
                note = COALESCE($6, note),
                occurred_on = COALESCE($7, occurred_on)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.kind)
            .bind(input.amount_cents)
            .bind(&input.category)
            .bind(&input.note)
            .bind(input.occurred_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-kind totals and net over an optional inclusive date range.
    pub async fn summary(
        pool: &PgPool,
        user_id: DbId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TransactionSummary, sqlx::Error> {
        sqlx::query_as::<_, TransactionSummary>(
            "SELECT
                COALESCE(SUM(amount_cents) FILTER (WHERE kind = 'income'), 0)::BIGINT
                    AS income_cents,
                COALESCE(SUM(amount_cents) FILTER (WHERE kind = 'expense'), 0)::BIGINT
                    AS expense_cents,
                (COALESCE(SUM(amount_cents) FILTER (WHERE kind = 'income'), 0)
                  - COALESCE(SUM(amount_cents) FILTER (WHERE kind = 'expense'), 0))::BIGINT
                    AS net_cents
             FROM transactions
             WHERE user_id = $1
               AND ($2::date IS NULL OR occurred_on >= $2)
               AND ($3::date IS NULL OR occurred_on <= $3)",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }
}
