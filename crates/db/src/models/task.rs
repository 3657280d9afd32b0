//! Task entity model and DTOs. Tasks always belong to a project; ownership
//! is validated through the parent project's owner.

use chrono::NaiveDate;
use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub done: bool,
    pub due_on: Option<NaiveDate>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub due_on: Option<NaiveDate>,
    pub position: Option<i32>,
}

/// DTO for updating a task. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub done: Option<bool>,
    pub due_on: Option<NaiveDate>,
    pub position: Option<i32>,
}
