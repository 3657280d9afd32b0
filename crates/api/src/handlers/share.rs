//! Public (token-addressed, unauthenticated) share surface: proposal
//! viewing and accept/decline, contract viewing and signing.
//!
//! Tokens are unguessable 32-character strings; an unknown token reads as
//! 404 and an expired proposal link as 410 Gone.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use countersign_core::error::CoreError;
use countersign_core::lifecycle::{ContractStatus, ProposalStatus};
use countersign_core::types::Timestamp;
use countersign_db::models::contract::{Contract, SignRequest, Signatory};
use countersign_db::models::proposal::Proposal;
use countersign_db::repositories::{ContractRepo, ProposalRepo, SignatoryRepo};
use serde::Serialize;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public view types
// ---------------------------------------------------------------------------

/// What a proposal recipient sees. No owner ids, no tokens.
#[derive(Debug, Serialize)]
pub struct ProposalPublic {
    pub title: String,
    pub content: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub valid_until: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
}

/// What a contract signer sees about the document.
#[derive(Debug, Serialize)]
pub struct ContractPublic {
    pub title: String,
    pub status: String,
    pub file_url: Option<String>,
    pub sent_at: Option<Timestamp>,
}

/// What a contract signer sees about themselves and co-signers.
#[derive(Debug, Serialize)]
pub struct SignatoryPublic {
    pub name: String,
    pub email: String,
    pub signed: bool,
    pub signed_at: Option<Timestamp>,
}

/// Response for the contract signing page.
#[derive(Debug, Serialize)]
pub struct SigningView {
    pub contract: ContractPublic,
    /// The signer this link belongs to.
    pub signer: SignatoryPublic,
    /// All parties, for progress display.
    pub signatories: Vec<SignatoryPublic>,
}

fn proposal_public(p: &Proposal) -> ProposalPublic {
    ProposalPublic {
        title: p.title.clone(),
        content: p.content.clone(),
        amount_cents: p.amount_cents,
        currency: p.currency.clone(),
        status: p.status.clone(),
        valid_until: p.valid_until,
        sent_at: p.sent_at,
    }
}

fn contract_public(c: &Contract) -> ContractPublic {
    ContractPublic {
        title: c.title.clone(),
        status: c.status.clone(),
        file_url: c.file_url.clone(),
        sent_at: c.sent_at,
    }
}

fn signatory_public(s: &Signatory) -> SignatoryPublic {
    SignatoryPublic {
        name: s.name.clone(),
        email: s.email.clone(),
        signed: s.signed,
        signed_at: s.signed_at,
    }
}

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

/// Look up a proposal by share token, lazily expiring stale links.
///
/// Returns 404 for unknown tokens and 410 once `valid_until` has passed.
async fn resolve_shared_proposal(state: &AppState, token: &str) -> AppResult<Proposal> {
    let proposal = ProposalRepo::find_by_share_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Share link not found".into()))?;

    let status = ProposalStatus::parse(&proposal.status)?;
    let past_deadline = proposal
        .valid_until
        .is_some_and(|deadline| deadline < Utc::now());

    if status == ProposalStatus::Expired {
        return Err(AppError::Core(CoreError::Gone(
            "This proposal has expired".into(),
        )));
    }
    if past_deadline && !status.is_terminal() {
        ProposalRepo::mark_expired(&state.pool, proposal.id).await?;
        return Err(AppError::Core(CoreError::Gone(
            "This proposal has expired".into(),
        )));
    }

    Ok(proposal)
}

/// GET /api/v1/share/proposals/{token}
///
/// Public proposal view. First view moves `sent -> viewed`; every view bumps
/// the counter.
pub async fn view_proposal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<ProposalPublic>>> {
    let proposal = resolve_shared_proposal(&state, &token).await?;

    // Terminal proposals still render; tracking only applies while awaiting.
    let proposal = ProposalRepo::record_view(&state.pool, proposal.id)
        .await?
        .unwrap_or(proposal);

    Ok(Json(DataResponse {
        data: proposal_public(&proposal),
    }))
}

/// POST /api/v1/share/proposals/{token}/accept
///
/// Guarded `sent|viewed -> accepted`. A second accept (or an accept after a
/// decline) is a 409, not a double-process.
pub async fn accept_proposal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<ProposalPublic>>> {
    respond_to_proposal(&state, &token, ProposalStatus::Accepted, actions::ACCEPT).await
}

/// POST /api/v1/share/proposals/{token}/decline
///
/// Guarded `sent|viewed -> declined`.
pub async fn decline_proposal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<ProposalPublic>>> {
    respond_to_proposal(&state, &token, ProposalStatus::Declined, actions::DECLINE).await
}

async fn respond_to_proposal(
    state: &AppState,
    token: &str,
    to: ProposalStatus,
    action: &str,
) -> AppResult<Json<DataResponse<ProposalPublic>>> {
    let proposal = resolve_shared_proposal(state, token).await?;

    let responded = ProposalRepo::respond(&state.pool, proposal.id, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Proposal has already been {}",
                proposal.status
            )))
        })?;

    tracing::info!(proposal_id = responded.id, status = %responded.status, "Proposal response recorded");
    activity::record(
        &state.pool,
        responded.user_id,
        action,
        "proposal",
        Some(responded.id),
        Some(&responded.title),
    )
    .await;

    Ok(Json(DataResponse {
        data: proposal_public(&responded),
    }))
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Resolve a signing link to its signatory and contract.
async fn resolve_signing_link(
    state: &AppState,
    token: &str,
) -> AppResult<(Signatory, Contract)> {
    let signatory = SignatoryRepo::find_by_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Signing link not found".into()))?;
    let contract = ContractRepo::find_by_signing_token(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Signing link not found".into()))?;
    Ok((signatory, contract))
}

/// GET /api/v1/share/contracts/{token}
///
/// Signing page data; stamps the signatory's `viewed_at` on first open.
pub async fn view_contract(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<SigningView>>> {
    let (signatory, contract) = resolve_signing_link(&state, &token).await?;

    SignatoryRepo::mark_viewed(&state.pool, signatory.id).await?;

    let signatories = SignatoryRepo::list_for_contract(&state.pool, contract.id).await?;
    Ok(Json(DataResponse {
        data: SigningView {
            contract: contract_public(&contract),
            signer: signatory_public(&signatory),
            signatories: signatories.iter().map(signatory_public).collect(),
        },
    }))
}

/// POST /api/v1/share/contracts/{token}/sign
///
/// Record this signer's signature. Guarded against double-signing; when the
/// last signature lands, the contract flips `sent -> signed` in the same
/// transaction.
pub async fn sign_contract(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Json(input): Json<SignRequest>,
) -> AppResult<Json<DataResponse<SigningView>>> {
    if input.signature_url.trim().is_empty() {
        return Err(AppError::BadRequest("signature_url must not be empty".into()));
    }

    let (signatory, contract) = resolve_signing_link(&state, &token).await?;

    match ContractStatus::parse(&contract.status)? {
        ContractStatus::Sent => {}
        ContractStatus::Draft => {
            return Err(AppError::Core(CoreError::Conflict(
                "Contract is not open for signing yet".into(),
            )));
        }
        ContractStatus::Signed => {
            return Err(AppError::Core(CoreError::Conflict(
                "Contract is already fully signed".into(),
            )));
        }
    }

    let ip_address = client_ip(&headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut tx = state.pool.begin().await?;
    let signed = SignatoryRepo::sign(
        &mut *tx,
        signatory.id,
        input.signature_url.trim(),
        ip_address.as_deref(),
        user_agent.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict("You have already signed this contract".into()))
    })?;

    let completed = ContractRepo::mark_signed_if_complete(&mut *tx, contract.id).await?;
    tx.commit().await?;

    let contract = completed.unwrap_or(contract);
    tracing::info!(
        contract_id = contract.id,
        signatory_id = signed.id,
        contract_status = %contract.status,
        "Signature recorded",
    );
    activity::record(
        &state.pool,
        contract.user_id,
        actions::SIGN,
        "contract",
        Some(contract.id),
        Some(&signed.name),
    )
    .await;

    let signatories = SignatoryRepo::list_for_contract(&state.pool, contract.id).await?;
    Ok(Json(DataResponse {
        data: SigningView {
            contract: contract_public(&contract),
            signer: signatory_public(&signed),
            signatories: signatories.iter().map(signatory_public).collect(),
        },
    }))
}

/// Best-effort client IP: first hop of `x-forwarded-for` if present.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
