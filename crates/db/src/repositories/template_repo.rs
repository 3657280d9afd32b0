//! Repository for the `templates` and `template_images` tables.
//!
//! Every query is scoped by `user_id`; a row belonging to another user is
//! indistinguishable from a missing row.

use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::template::{
    CreateTemplate, CreateTemplateImage, Template, TemplateImage, UpdateTemplate,
};

const COLUMNS: &str = "id, user_id, name, description, content, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, template_id, url, position, created_at";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template. Run inside the transaction that bumped the
    /// usage counter.
    pub async fn create<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (user_id, name, description, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.content)
            .fetch_one(ex)
            .await
    }

    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a template. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                content = COALESCE($5, content),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template; image rows go with it via `ON DELETE CASCADE`.
    /// Run inside the transaction that decrements the usage counter.
    pub async fn delete<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(ex)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Attach an image, validating template ownership in the same statement.
    pub async fn add_image(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
        input: &CreateTemplateImage,
    ) -> Result<Option<TemplateImage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO template_images (template_id, url, position)
             SELECT t.id, $3, COALESCE($4, 0)
             FROM templates t WHERE t.id = $1 AND t.user_id = $2
             RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, TemplateImage>(&query)
            .bind(template_id)
            .bind(user_id)
            .bind(&input.url)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_images(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
    ) -> Result<Vec<TemplateImage>, sqlx::Error> {
        let query = format!(
            "SELECT i.{cols} FROM template_images i
             JOIN templates t ON t.id = i.template_id
             WHERE i.template_id = $1 AND t.user_id = $2
             ORDER BY i.position, i.id",
            cols = IMAGE_COLUMNS.replace(", ", ", i.")
        );
        sqlx::query_as::<_, TemplateImage>(&query)
            .bind(template_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Remove an image, validating ownership through the parent template.
    pub async fn delete_image(
        pool: &PgPool,
        user_id: DbId,
        template_id: DbId,
        image_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM template_images i
             USING templates t
             WHERE i.id = $1 AND i.template_id = $2
               AND t.id = i.template_id AND t.user_id = $3",
        )
        .bind(image_id)
        .bind(template_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count image rows for a template (cascade verification in tests).
    pub async fn count_images(pool: &PgPool, template_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM template_images WHERE template_id = $1")
                .bind(template_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
