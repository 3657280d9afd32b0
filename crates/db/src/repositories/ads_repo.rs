//! Repository for the `ad_accounts` and `ad_snapshots` tables.

use chrono::NaiveDate;
use countersign_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::ads::{AdAccount, AdSnapshot, SnapshotInput};

const ACCOUNT_COLUMNS: &str = "id, user_id, provider_account_id, access_token, oauth_state, \
     connected_at, created_at, updated_at";

const SNAPSHOT_COLUMNS: &str =
    "id, ad_account_id, snapshot_date, impressions, clicks, spend_cents, created_at";

pub struct AdsRepo;

impl AdsRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<AdAccount>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM ad_accounts WHERE user_id = $1");
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a fresh OAuth state for the user, creating the account row on
    /// first connect. A re-connect overwrites any stale pending state.
    pub async fn upsert_oauth_state(
        pool: &PgPool,
        user_id: DbId,
        state: &str,
    ) -> Result<AdAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_accounts (user_id, oauth_state)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_ad_accounts_user_id
             DO UPDATE SET oauth_state = $2, updated_at = NOW()
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(user_id)
            .bind(state)
            .fetch_one(pool)
            .await
    }

    /// Resolve the account awaiting the given OAuth state (callback lookup).
    pub async fn find_by_oauth_state(
        pool: &PgPool,
        state: &str,
    ) -> Result<Option<AdAccount>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM ad_accounts WHERE oauth_state = $1");
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(state)
            .fetch_optional(pool)
            .await
    }

    /// Complete the OAuth flow: persist the provider account id and access
    /// token, clear the pending state, stamp `connected_at`.
    pub async fn mark_connected(
        pool: &PgPool,
        id: DbId,
        provider_account_id: &str,
        access_token: &str,
        connected_at: Timestamp,
    ) -> Result<Option<AdAccount>, sqlx::Error> {
        let query = format!(
            "UPDATE ad_accounts
             SET provider_account_id = $2, access_token = $3, oauth_state = NULL,
                 connected_at = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(id)
            .bind(provider_account_id)
            .bind(access_token)
            .bind(connected_at)
            .fetch_optional(pool)
            .await
    }

    /// Disconnect: drop the account row; snapshots cascade.
    pub async fn disconnect(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ad_accounts WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Upsert one day of metrics, keyed on (account, date).
    pub async fn upsert_snapshot(
        pool: &PgPool,
        ad_account_id: DbId,
        input: &SnapshotInput,
    ) -> Result<AdSnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_snapshots (ad_account_id, snapshot_date, impressions, clicks, spend_cents)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_ad_snapshots_account_date
             DO UPDATE SET impressions = $3, clicks = $4, spend_cents = $5
             RETURNING {SNAPSHOT_COLUMNS}"
        );
        sqlx::query_as::<_, AdSnapshot>(&query)
            .bind(ad_account_id)
            .bind(input.snapshot_date)
            .bind(input.impressions)
            .bind(input.clicks)
            .bind(input.spend_cents)
            .fetch_one(pool)
            .await
    }

    /// List snapshots for the user's account, oldest first, optionally
    /// bounded by an inclusive date range.
    pub async fn list_snapshots(
        pool: &PgPool,
        user_id: DbId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AdSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT s.{cols} FROM ad_snapshots s
             JOIN ad_accounts a ON a.id = s.ad_account_id
             WHERE a.user_id = $1
               AND ($2::date IS NULL OR s.snapshot_date >= $2)
               AND ($3::date IS NULL OR s.snapshot_date <= $3)
             ORDER BY s.snapshot_date",
            cols = SNAPSHOT_COLUMNS.replace(", ", ", s.")
        );
        sqlx::query_as::<_, AdSnapshot>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}
