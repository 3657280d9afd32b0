//! Repository for Kanban boards, lists, and cards.
//!
//! Lists and cards are always reached through the parent board's owner; the
//! join is part of every statement, so a foreign board id reads as
//! "not found".

use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::board::{
    Board, BoardCard, BoardList, BoardView, CreateBoard, CreateBoardCard, CreateBoardList,
    ListWithCards, MoveCard, UpdateBoard, UpdateBoardCard, UpdateBoardList,
};

const BOARD_COLUMNS: &str = "id, user_id, name, created_at, updated_at";
const LIST_COLUMNS: &str = "id, board_id, name, position, created_at";
const CARD_COLUMNS: &str =
    "id, list_id, title, description, position, due_on, created_at, updated_at";

pub struct BoardRepo;

impl BoardRepo {
    // -----------------------------------------------------------------------
    // Boards
    // -----------------------------------------------------------------------

    /// Insert a new board. Run inside the transaction that bumped the usage
    /// counter.
    pub async fn create<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateBoard,
    ) -> Result<Board, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards (user_id, name) VALUES ($1, $2) RETURNING {BOARD_COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(user_id)
            .bind(&input.name)
            .fetch_one(ex)
            .await
    }

    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Full board view: board plus position-ordered lists with their cards.
    pub async fn view(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<BoardView>, sqlx::Error> {
        let Some(board) = Self::find_by_id(pool, user_id, id).await? else {
            return Ok(None);
        };

        let list_query = format!(
            "SELECT {LIST_COLUMNS} FROM board_lists WHERE board_id = $1 ORDER BY position, id"
        );
        let lists = sqlx::query_as::<_, BoardList>(&list_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let card_query = format!(
            "SELECT c.{cols} FROM board_cards c
             JOIN board_lists l ON l.id = c.list_id
             WHERE l.board_id = $1
             ORDER BY c.position, c.id",
            cols = CARD_COLUMNS.replace(", ", ", c.")
        );
        let cards = sqlx::query_as::<_, BoardCard>(&card_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let lists = lists
            .into_iter()
            .map(|list| {
                let cards = cards
                    .iter()
                    .filter(|c| c.list_id == list.id)
                    .cloned()
                    .collect();
                ListWithCards { list, cards }
            })
            .collect();

        Ok(Some(BoardView { board, lists }))
    }

    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateBoard,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET name = COALESCE($3, name), updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {BOARD_COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a board; lists and cards cascade. Run inside the transaction
    /// that decrements the usage counter.
    pub async fn delete<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(ex)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    /// Add a list, validating board ownership in the same statement.
    pub async fn add_list(
        pool: &PgPool,
        user_id: DbId,
        board_id: DbId,
        input: &CreateBoardList,
    ) -> Result<Option<BoardList>, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_lists (board_id, name, position)
             SELECT b.id, $3, COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0)
                                            FROM board_lists WHERE board_id = $1))
             FROM boards b WHERE b.id = $1 AND b.user_id = $2
             RETURNING {LIST_COLUMNS}"
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(board_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_list(
        pool: &PgPool,
        user_id: DbId,
        board_id: DbId,
        list_id: DbId,
        input: &UpdateBoardList,
    ) -> Result<Option<BoardList>, sqlx::Error> {
        let query = format!(
            "UPDATE board_lists l SET
                name = COALESCE($4, l.name),
                position = COALESCE($5, l.position)
             FROM boards b
             WHERE l.id = $1 AND l.board_id = $2
               AND b.id = l.board_id AND b.user_id = $3
             RETURNING l.{cols}",
            cols = LIST_COLUMNS.replace(", ", ", l.")
        );
        sqlx::query_as::<_, BoardList>(&query)
            .bind(list_id)
            .bind(board_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_list(
        pool: &PgPool,
        user_id: DbId,
        board_id: DbId,
        list_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM board_lists l
             USING boards b
             WHERE l.id = $1 AND l.board_id = $2
               AND b.id = l.board_id AND b.user_id = $3",
        )
        .bind(list_id)
        .bind(board_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Cards
    // -----------------------------------------------------------------------

    /// Add a card, validating the list belongs to the caller's board.
    pub async fn add_card(
        pool: &PgPool,
        user_id: DbId,
        board_id: DbId,
        list_id: DbId,
        input: &CreateBoardCard,
    ) -> Result<Option<BoardCard>, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_cards (list_id, title, description, position, due_on)
             SELECT l.id, $4, $5,
                    COALESCE($6, (SELECT COALESCE(MAX(position) + 1, 0)
                                  FROM board_cards WHERE list_id = $1)),
                    $7
             FROM board_lists l
             JOIN boards b ON b.id = l.board_id
             WHERE l.id = $1 AND l.board_id = $2 AND b.user_id = $3
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, BoardCard>(&query)
            .bind(list_id)
            .bind(board_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.due_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_card(
        pool: &PgPool,
        user_id: DbId,
        card_id: DbId,
        input: &UpdateBoardCard,
    ) -> Result<Option<BoardCard>, sqlx::Error> {
        let query = format!(
            "UPDATE board_cards c SET
                title = COALESCE($3, c.title),
                description = COALESCE($4, c.description),
                position = COALESCE($5, c.position),
                due_on = COALESCE($6, c.due_on),
                updated_at = NOW()
             FROM board_lists l
             JOIN boards b ON b.id = l.board_id
             WHERE c.id = $1 AND l.id = c.list_id AND b.user_id = $2
             RETURNING c.{cols}",
            cols = CARD_COLUMNS.replace(", ", ", c.")
        );
        sqlx::query_as::<_, BoardCard>(&query)
            .bind(card_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.due_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_card(
        pool: &PgPool,
        user_id: DbId,
        card_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM board_cards c
             USING board_lists l, boards b
             WHERE c.id = $1 AND l.id = c.list_id AND b.id = l.board_id AND b.user_id = $2",
        )
        .bind(card_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a card to another list. Both the card's current list and the
    /// target list must belong to a board owned by the caller; the target
    /// check is a subquery in the same statement.
    pub async fn move_card(
        pool: &PgPool,
        user_id: DbId,
        card_id: DbId,
        input: &MoveCard,
    ) -> Result<Option<BoardCard>, sqlx::Error> {
        let query = format!(
            "UPDATE board_cards c SET
                list_id = $3,
                position = $4,
                updated_at = NOW()
             FROM board_lists l
             JOIN boards b ON b.id = l.board_id
             WHERE c.id = $1 AND l.id = c.list_id AND b.user_id = $2
               AND EXISTS (
                   SELECT 1 FROM board_lists tl
                   JOIN boards tb ON tb.id = tl.board_id
                   WHERE tl.id = $3 AND tb.user_id = $2
               )
             RETURNING c.{cols}",
            cols = CARD_COLUMNS.replace(", ", ", c.")
        );
        sqlx::query_as::<_, BoardCard>(&query)
            .bind(card_id)
            .bind(user_id)
            .bind(input.list_id)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }
}
