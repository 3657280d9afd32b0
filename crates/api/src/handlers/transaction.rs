//! Handlers for the `/transactions` finance ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use countersign_core::error::CoreError;
use countersign_core::types::DbId;
use countersign_db::models::transaction::{
    CreateTransaction, Transaction, TransactionSummary, UpdateTransaction, TRANSACTION_KINDS,
};
use countersign_db::repositories::TransactionRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?from=&to=` inclusive date-range filter.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn validate_kind(kind: &str) -> AppResult<()> {
    if TRANSACTION_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid kind '{kind}'. Must be one of: {}",
            TRANSACTION_KINDS.join(", ")
        )))
    }
}

/// POST /api/v1/transactions
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTransaction>,
) -> AppResult<(StatusCode, Json<DataResponse<Transaction>>)> {
    validate_kind(&input.kind)?;
    if input.amount_cents < 0 {
        return Err(AppError::BadRequest("amount_cents must not be negative".into()));
    }

    let transaction = TransactionRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: transaction }),
    ))
}

/// GET /api/v1/transactions
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<Transaction>>>> {
    let transactions =
        TransactionRepo::list(&state.pool, auth.user_id, range.from, range.to).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// GET /api/v1/transactions/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<TransactionSummary>>> {
    let summary = TransactionRepo::summary(&state.pool, auth.user_id, range.from, range.to).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// PUT /api/v1/transactions/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransaction>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    if let Some(kind) = input.kind.as_deref() {
        validate_kind(kind)?;
    }
    if input.amount_cents.is_some_and(|v| v < 0) {
        return Err(AppError::BadRequest("amount_cents must not be negative".into()));
    }

    let transaction = TransactionRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Transaction",
            id,
        }))?;
    Ok(Json(DataResponse { data: transaction }))
}

/// DELETE /api/v1/transactions/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TransactionRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Transaction",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
