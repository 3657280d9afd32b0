//! Owner-facing handlers for the `/proposals` resource.
//!
//! The public share-link surface (view, accept, decline) lives in
//! `handlers::share`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::plan::UsageCounter;
use countersign_core::token;
use countersign_core::types::DbId;
use countersign_db::models::proposal::{CreateProposal, Proposal, UpdateProposal};
use countersign_db::repositories::ProposalRepo;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::quota::{begin_with_quota, release_quota};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Proposal",
        id,
    })
}

/// POST /api/v1/proposals
///
/// Create a draft proposal; counts against the plan's proposal ceiling.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProposal>,
) -> AppResult<(StatusCode, Json<DataResponse<Proposal>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if input.amount_cents.is_some_and(|v| v < 0) {
        return Err(AppError::BadRequest("amount_cents must not be negative".into()));
    }

    let mut tx = begin_with_quota(&state, auth.user_id, UsageCounter::Proposals).await?;
    let proposal = ProposalRepo::create(&mut *tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(proposal_id = proposal.id, user_id = auth.user_id, "Proposal created");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::CREATE,
        "proposal",
        Some(proposal.id),
        Some(&proposal.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: proposal })))
}

/// GET /api/v1/proposals
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Proposal>>>> {
    let proposals = ProposalRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/proposals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let proposal = ProposalRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: proposal }))
}

/// PUT /api/v1/proposals/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposal>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let proposal = ProposalRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(proposal_id = id, user_id = auth.user_id, "Proposal updated");

    Ok(Json(DataResponse { data: proposal }))
}

/// DELETE /api/v1/proposals/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = ProposalRepo::delete(&mut *tx, auth.user_id, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    release_quota(&mut tx, auth.user_id, UsageCounter::Proposals).await?;
    tx.commit().await?;

    tracing::info!(proposal_id = id, user_id = auth.user_id, "Proposal deleted");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DELETE,
        "proposal",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/proposals/{id}/send
///
/// Guarded `draft -> sent`: issues the public share token. Re-sending an
/// already-sent proposal is a 409.
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Proposal>>> {
    let share_token = token::link_token();
    let sent = ProposalRepo::mark_sent(&state.pool, auth.user_id, id, &share_token).await?;

    let proposal = match sent {
        Some(proposal) => proposal,
        None => {
            // Distinguish "not yours / missing" from "wrong state".
            let existing = ProposalRepo::find_by_id(&state.pool, auth.user_id, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Proposal is already {}",
                existing.status
            ))));
        }
    };

    tracing::info!(proposal_id = id, user_id = auth.user_id, "Proposal sent");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::SEND,
        "proposal",
        Some(id),
        Some(&proposal.title),
    )
    .await;

    Ok(Json(DataResponse { data: proposal }))
}
