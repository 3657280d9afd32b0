//! Contract and signatory models and DTOs.

use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A contract row from the `contracts` table.
///
/// `status` holds a `countersign_core::lifecycle::ContractStatus` name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: Option<DbId>,
    pub title: String,
    /// Public URL of the source PDF; required before sending.
    pub file_url: Option<String>,
    pub status: String,
    pub sent_at: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A signatory row from the `signatories` table.
///
/// Serialized in owner-facing responses (the owner distributes signing
/// links); the public share endpoint exposes a reduced view instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Signatory {
    pub id: DbId,
    pub contract_id: DbId,
    pub name: String,
    pub email: String,
    pub signing_token: String,
    pub signed: bool,
    pub signature_url: Option<String>,
    pub viewed_at: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// DTO for creating a contract (always starts as a draft).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub title: String,
    pub client_id: Option<DbId>,
    pub file_url: Option<String>,
}

/// DTO for updating contract fields (draft only).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContract {
    pub title: Option<String>,
    pub client_id: Option<DbId>,
    pub file_url: Option<String>,
}

/// DTO for adding a signatory to a draft contract.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSignatory {
    pub name: String,
    pub email: String,
    /// Defaults to the end of the signer list if omitted.
    pub position: Option<i32>,
}

/// Signature capture payload posted from the public signing page.
#[derive(Debug, Clone, Deserialize)]
pub struct SignRequest {
    /// Public URL of the captured signature image.
    pub signature_url: String,
}
