//! Repository for the `tasks` table. Tasks carry no owner column; every
//! access is validated through the parent project's `user_id`.

use countersign_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

const COLUMNS: &str = "id, project_id, title, done, due_on, position, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task, validating project ownership in the same statement.
    /// Returns `None` when the project is missing or foreign.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, title, due_on, position)
             SELECT p.id, $3, $4, COALESCE($5, 0)
             FROM projects p WHERE p.id = $1 AND p.user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.due_on)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT t.{cols} FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = $1 AND p.user_id = $2
             ORDER BY t.position, t.id",
            cols = COLUMNS.replace(", ", ", t.")
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks t SET
                title = COALESCE($4, t.title),
                done = COALESCE($5, t.done),
                due_on = COALESCE($6, t.due_on),
                position = COALESCE($7, t.position),
                updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND t.project_id = $2
               AND p.id = t.project_id AND p.user_id = $3
             RETURNING t.{cols}",
            cols = COLUMNS.replace(", ", ", t.")
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(project_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.done)
            .bind(input.due_on)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(
        pool: &PgPool,
        user_id: DbId,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tasks t
             USING projects p
             WHERE t.id = $1 AND t.project_id = $2
               AND p.id = t.project_id AND p.user_id = $3",
        )
        .bind(id)
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
