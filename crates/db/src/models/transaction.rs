//! Finance transaction model and DTOs.

use chrono::NaiveDate;
use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Allowed transaction kinds.
pub const TRANSACTION_KINDS: &[&str] = &["income", "expense"];

/// A transaction row from the `transactions` table. Amounts are integer
/// cents; no floating-point money anywhere.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub amount_cents: i64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for creating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    pub kind: String,
    pub amount_cents: i64,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_on: NaiveDate,
}

/// DTO for updating a transaction. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTransaction {
    pub kind: Option<String>,
    pub amount_cents: Option<i64>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub occurred_on: Option<NaiveDate>,
}

/// Aggregated totals for `GET /transactions/summary`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionSummary {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
}
