//! Repository for the `users` table: accounts, login bookkeeping, and the
//! plan-ceiling usage counters.

use countersign_core::plan::UsageCounter;
use countersign_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, full_name, company_name, website, avatar_url, \
     plan, templates_count, proposals_count, contracts_count, clients_count, boards_count, \
     is_active, failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Provides account and usage-counter operations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user on the free plan, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, full_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. Only non-`None` fields are applied.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                company_name = COALESCE($3, company_name),
                website = COALESCE($4, website),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.company_name)
            .bind(&input.website)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Login bookkeeping
    // -----------------------------------------------------------------------

    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Plan usage counters
    // -----------------------------------------------------------------------

    /// Guarded counter increment: bumps the counter only while it is below
    /// `limit`, in the same statement that reads it. Run inside the insert
    /// transaction; returns `false` when the plan ceiling is hit, in which
    /// case the caller rolls back.
    pub async fn try_increment_usage<'e>(
        ex: impl PgExecutor<'e>,
        id: DbId,
        counter: UsageCounter,
        limit: i64,
    ) -> Result<bool, sqlx::Error> {
        // `counter.column()` comes from a closed enum, never from input.
        let query = format!(
            "UPDATE users SET {col} = {col} + 1, updated_at = NOW()
             WHERE id = $1 AND {col} < $2",
            col = counter.column()
        );
        let result = sqlx::query(&query).bind(id).bind(limit).execute(ex).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Counter decrement, floored at zero. Run inside the delete transaction.
    pub async fn decrement_usage<'e>(
        ex: impl PgExecutor<'e>,
        id: DbId,
        counter: UsageCounter,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE users SET {col} = GREATEST({col} - 1, 0), updated_at = NOW()
             WHERE id = $1",
            col = counter.column()
        );
        sqlx::query(&query).bind(id).execute(ex).await?;
        Ok(())
    }
}
