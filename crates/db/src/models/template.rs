//! Template entity model and DTOs.

use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A template row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An image attached to a template.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateImage {
    pub id: DbId,
    pub template_id: DbId,
    pub url: String,
    pub position: i32,
    pub created_at: Timestamp,
}

/// DTO for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

/// DTO for updating a template. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

/// DTO for attaching an image to a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateImage {
    pub url: String,
    /// Defaults to 0 (prepend) if omitted.
    pub position: Option<i32>,
}
