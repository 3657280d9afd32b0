//! Ads integration models: the connected OAuth account and daily metric
//! snapshots.

use chrono::NaiveDate;
use countersign_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The per-user ads provider connection from the `ad_accounts` table.
///
/// The access token and pending OAuth state never leave the server.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub provider_account_id: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    #[serde(skip_serializing)]
    pub oauth_state: Option<String>,
    pub connected_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdAccount {
    /// An account counts as connected once the callback stored a provider id.
    pub fn is_connected(&self) -> bool {
        self.provider_account_id.is_some()
    }
}

/// A daily metrics row from the `ad_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdSnapshot {
    pub id: DbId,
    pub ad_account_id: DbId,
    pub snapshot_date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub spend_cents: i64,
    pub created_at: Timestamp,
}

/// One day of provider metrics, as pulled during a refresh.
#[derive(Debug, Clone)]
pub struct SnapshotInput {
    pub snapshot_date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub spend_cents: i64,
}
