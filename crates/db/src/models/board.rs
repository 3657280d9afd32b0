//! Kanban board, list, and card models and DTOs.
//!
//! Lists and cards carry no owner column of their own; every access is
//! validated through the parent board's `user_id` with a join.

use chrono::NaiveDate;
use countersign_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A board row from the `boards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Board {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list row from the `board_lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardList {
    pub id: DbId,
    pub board_id: DbId,
    pub name: String,
    pub position: i32,
    pub created_at: Timestamp,
}

/// A card row from the `board_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardCard {
    pub id: DbId,
    pub list_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub due_on: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list with its cards, as returned by the full-board view.
#[derive(Debug, Clone, Serialize)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: BoardList,
    pub cards: Vec<BoardCard>,
}

/// Full board view: the board plus position-ordered lists and cards.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoard {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardList {
    pub name: String,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoardList {
    pub name: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardCard {
    pub title: String,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoardCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub due_on: Option<NaiveDate>,
}

/// Payload for `POST /cards/{id}/move`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveCard {
    pub list_id: DbId,
    pub position: i32,
}
