//! Repository for the `proposals` table.
//!
//! Status writes are compare-and-swap: every transition names the expected
//! current status in the WHERE clause, so concurrent accept/decline/send
//! requests cannot both win.

use countersign_core::lifecycle::ProposalStatus;
use countersign_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::proposal::{CreateProposal, Proposal, UpdateProposal};

const COLUMNS: &str = "id, user_id, client_id, template_id, title, content, amount_cents, \
     currency, status, share_token, valid_until, view_count, sent_at, viewed_at, responded_at, \
     created_at, updated_at";

pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a new draft. Run inside the transaction that bumped the usage
    /// counter.
    pub async fn create<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateProposal,
    ) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals
                (user_id, client_id, template_id, title, content, amount_cents, currency, valid_until)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), COALESCE($7, 'USD'), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(user_id)
            .bind(input.client_id)
            .bind(input.template_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(input.valid_until)
            .fetch_one(ex)
            .await
    }

    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update content fields. The status column is untouchable here.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateProposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET
                title = COALESCE($3, title),
                client_id = COALESCE($4, client_id),
                template_id = COALESCE($5, template_id),
                content = COALESCE($6, content),
                amount_cents = COALESCE($7, amount_cents),
                currency = COALESCE($8, currency),
                valid_until = COALESCE($9, valid_until),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.client_id)
            .bind(input.template_id)
            .bind(&input.content)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(input.valid_until)
            .fetch_optional(pool)
            .await
    }

    /// Delete a proposal. Run inside the transaction that decrements the
    /// usage counter.
    pub async fn delete<'e>(
        ex: impl PgExecutor<'e>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM proposals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(ex)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lifecycle (compare-and-swap)
    // -----------------------------------------------------------------------

    /// `draft -> sent`: issues the share token and stamps `sent_at`.
    /// Returns `None` if the proposal is missing, foreign, or not a draft.
    pub async fn mark_sent(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        share_token: &str,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals
             SET status = 'sent', share_token = $3, sent_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(user_id)
            .bind(share_token)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_share_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE share_token = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Record a public view: bumps `view_count`, moves `sent -> viewed` on
    /// first view, stamps `viewed_at` once. No-op in terminal states.
    pub async fn record_view(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals
             SET view_count = view_count + 1,
                 status = CASE WHEN status = 'sent' THEN 'viewed' ELSE status END,
                 viewed_at = COALESCE(viewed_at, NOW()),
                 updated_at = NOW()
             WHERE id = $1 AND status IN ('sent', 'viewed')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lazily expire a stale share link. Only awaiting proposals flip.
    pub async fn mark_expired(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals
             SET status = 'expired', updated_at = NOW()
             WHERE id = $1 AND status IN ('sent', 'viewed')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Recipient response: `sent|viewed -> accepted|declined`. Returns `None`
    /// when the guard fails (already responded, expired, or still a draft),
    /// so a second accept loses the race instead of double-processing.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        to: ProposalStatus,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let from = ProposalStatus::respondable()
            .iter()
            .map(|s| format!("'{s}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE proposals
             SET status = $2, responded_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status IN ({from})
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }
}
