//! Plan-ceiling enforcement for resource creation and deletion.
//!
//! Creation handlers open the transaction here: the guarded counter
//! increment and the row insert commit together, so two concurrent creates
//! cannot both slip under the ceiling and an aborted insert never leaks a
//! counted slot.

use countersign_core::error::CoreError;
use countersign_core::plan::{Plan, UsageCounter};
use countersign_core::types::DbId;
use countersign_db::repositories::UserRepo;
use sqlx::{Postgres, Transaction};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Begin a transaction with one unit of quota for `counter` already claimed.
///
/// Fails with 403 when the user's plan ceiling is reached; the claimed unit
/// is released automatically if the returned transaction is dropped without
/// committing.
pub async fn begin_with_quota(
    state: &AppState,
    user_id: DbId,
    counter: UsageCounter,
) -> AppResult<Transaction<'static, Postgres>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    let plan = Plan::parse(&user.plan)?;
    let limit = counter.limit(plan);

    let mut tx = state.pool.begin().await?;
    let granted = UserRepo::try_increment_usage(&mut *tx, user_id, counter, limit).await?;
    if !granted {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Plan limit reached: the {} plan allows at most {} {}",
            plan.as_str(),
            limit,
            counter.resource_name(),
        ))));
    }
    Ok(tx)
}

/// Release one unit of quota inside an open delete transaction.
pub async fn release_quota(
    tx: &mut Transaction<'static, Postgres>,
    user_id: DbId,
    counter: UsageCounter,
) -> AppResult<()> {
    UserRepo::decrement_usage(&mut **tx, user_id, counter).await?;
    Ok(())
}
