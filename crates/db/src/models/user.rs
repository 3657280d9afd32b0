//! User account model and DTOs.

use countersign_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// A user row from the `users` table.
///
/// Deliberately not `Serialize`: the row carries the password hash and
/// lockout bookkeeping. Handlers expose `UserProfile` views instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub plan: String,
    pub templates_count: i64,
    pub proposals_count: i64,
    pub contracts_count: i64,
    pub clients_count: i64,
    pub boards_count: i64,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new user (password already hashed).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// DTO for profile updates. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
}
