//! Proposal entity model and DTOs.

use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A proposal row from the `proposals` table.
///
/// `status` holds a `countersign_core::lifecycle::ProposalStatus` name; the
/// column is only ever written through guarded compare-and-swap updates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub title: String,
    pub content: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub share_token: Option<String>,
    pub valid_until: Option<Timestamp>,
    pub view_count: i64,
    pub sent_at: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a proposal (always starts as a draft).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProposal {
    pub title: String,
    pub client_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub content: Option<String>,
    pub amount_cents: Option<i64>,
    /// Defaults to `USD` if omitted.
    pub currency: Option<String>,
    pub valid_until: Option<Timestamp>,
}

/// DTO for updating proposal fields. Status is never set here; lifecycle
/// moves go through the send/accept/decline operations.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProposal {
    pub title: Option<String>,
    pub client_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub content: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub valid_until: Option<Timestamp>,
}
