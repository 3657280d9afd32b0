//! Owner-facing handlers for the `/contracts` resource: CRUD, signatory
//! management, sending, and the signed-PDF certificate download.
//!
//! The public signing surface lives in `handlers::share`.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::lifecycle::ContractStatus;
use countersign_core::plan::UsageCounter;
use countersign_core::token;
use countersign_core::types::DbId;
use countersign_db::models::contract::{
    Contract, CreateContract, CreateSignatory, Signatory, UpdateContract,
};
use countersign_db::repositories::{ContractRepo, SignatoryRepo};
use serde::Serialize;

use crate::activity::{self, actions};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::quota::{begin_with_quota, release_quota};
use crate::response::DataResponse;
use crate::signing;
use crate::state::AppState;

/// Contract plus its signer list, as returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct ContractDetail {
    #[serde(flatten)]
    pub contract: Contract,
    pub signatories: Vec<Signatory>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Contract",
        id,
    })
}

/// POST /api/v1/contracts
///
/// Create a draft contract; counts against the plan's contract ceiling.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<DataResponse<Contract>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let mut tx = begin_with_quota(&state, auth.user_id, UsageCounter::Contracts).await?;
    let contract = ContractRepo::create(&mut *tx, auth.user_id, &input).await?;
    tx.commit().await?;

    tracing::info!(contract_id = contract.id, user_id = auth.user_id, "Contract created");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::CREATE,
        "contract",
        Some(contract.id),
        Some(&contract.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// GET /api/v1/contracts
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Contract>>>> {
    let contracts = ContractRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/{id}
///
/// Full detail: the contract plus its signer list.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContractDetail>>> {
    let contract = ContractRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let signatories = SignatoryRepo::list_for_contract(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ContractDetail {
            contract,
            signatories,
        },
    }))
}

/// PUT /api/v1/contracts/{id}
///
/// Drafts only; sent and signed contracts are immutable.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let updated = ContractRepo::update(&state.pool, auth.user_id, id, &input).await?;

    let contract = match updated {
        Some(contract) => contract,
        None => {
            let existing = ContractRepo::find_by_id(&state.pool, auth.user_id, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Contract is {} and can no longer be edited",
                existing.status
            ))));
        }
    };

    tracing::info!(contract_id = id, user_id = auth.user_id, "Contract updated");

    Ok(Json(DataResponse { data: contract }))
}

/// DELETE /api/v1/contracts/{id}
///
/// Deletes the contract and its signatories, and frees a plan slot, in one
/// transaction.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;
    let deleted = ContractRepo::delete(&mut *tx, auth.user_id, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    release_quota(&mut tx, auth.user_id, UsageCounter::Contracts).await?;
    tx.commit().await?;

    tracing::info!(contract_id = id, user_id = auth.user_id, "Contract deleted");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DELETE,
        "contract",
        Some(id),
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/contracts/{id}/send
///
/// Guarded `draft -> sent`. Requires a source file and at least one
/// signatory.
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let contract = ContractRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let status = ContractStatus::parse(&contract.status)?;
    if !status.can_transition(ContractStatus::Sent) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Contract is already {}",
            contract.status
        ))));
    }
    if contract.file_url.is_none() {
        return Err(AppError::BadRequest(
            "Contract needs a source file before it can be sent".into(),
        ));
    }
    if SignatoryRepo::count_for_contract(&state.pool, id).await? == 0 {
        return Err(AppError::BadRequest(
            "Contract needs at least one signatory before it can be sent".into(),
        ));
    }

    let contract = ContractRepo::mark_sent(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| {
            // Lost a race with a concurrent send.
            AppError::Core(CoreError::Conflict("Contract is already sent".into()))
        })?;

    tracing::info!(contract_id = id, user_id = auth.user_id, "Contract sent for signing");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::SEND,
        "contract",
        Some(id),
        Some(&contract.title),
    )
    .await;

    Ok(Json(DataResponse { data: contract }))
}

// ---------------------------------------------------------------------------
// Signatories
// ---------------------------------------------------------------------------

/// POST /api/v1/contracts/{id}/signatories
///
/// Drafts only: the signer list is frozen once the contract is sent.
pub async fn add_signatory(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSignatory>,
) -> AppResult<(StatusCode, Json<DataResponse<Signatory>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if input.email.trim().is_empty() {
        return Err(AppError::BadRequest("email must not be empty".into()));
    }

    let contract = ContractRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if ContractStatus::parse(&contract.status)? != ContractStatus::Draft {
        return Err(AppError::Core(CoreError::Conflict(
            "Signatories can only be added to draft contracts".into(),
        )));
    }

    let signing_token = token::link_token();
    let signatory = SignatoryRepo::add(&state.pool, id, &input, &signing_token).await?;

    tracing::info!(
        contract_id = id,
        signatory_id = signatory.id,
        user_id = auth.user_id,
        "Signatory added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: signatory })))
}

/// DELETE /api/v1/contracts/{id}/signatories/{signatory_id}
pub async fn remove_signatory(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, signatory_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = SignatoryRepo::delete(&state.pool, auth.user_id, id, signatory_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Signatory",
            id: signatory_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts/{id}/certificate
///
/// Assemble and download the signed PDF with the appended certificate page.
/// 400 if the contract has no source file.
pub async fn certificate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contract = ContractRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let signatories = SignatoryRepo::list_for_contract(&state.pool, id).await?;

    let generated = signing::generate_signed_pdf(&state, &contract, &signatories).await?;

    tracing::info!(
        contract_id = id,
        user_id = auth.user_id,
        fingerprint = %generated.fingerprint,
        verification_code = %generated.verification_code,
        "Certificate generated",
    );

    let filename = format!("{}-certificate.pdf", signing::contract_reference(id));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        generated.pdf,
    ))
}
