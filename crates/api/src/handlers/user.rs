//! Handlers for `/users/me`: profile and plan usage.

use axum::extract::State;
use axum::Json;
use countersign_core::error::CoreError;
use countersign_core::plan::Plan;
use countersign_core::types::{DbId, Timestamp};
use countersign_db::models::user::{UpdateProfile, User};
use countersign_db::repositories::UserRepo;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Public profile view of a user row.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub plan: String,
    pub created_at: Timestamp,
}

/// Successful authentication response returned by register, login, refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Build the public profile view from a user row.
pub fn profile_response(user: &User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        company_name: user.company_name.clone(),
        website: user.website.clone(),
        avatar_url: user.avatar_url.clone(),
        plan: user.plan.clone(),
        created_at: user.created_at,
    }
}

/// GET /api/v1/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = fetch_user(&state, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: profile_response(&user),
    }))
}

/// PUT /api/v1/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");

    Ok(Json(DataResponse {
        data: profile_response(&user),
    }))
}

/// GET /api/v1/users/me/usage
///
/// Plan name, per-resource ceilings, and current counters.
pub async fn usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let user = fetch_user(&state, auth.user_id).await?;
    let plan = Plan::parse(&user.plan)?;
    let limits = plan.limits();

    Ok(Json(DataResponse {
        data: json!({
            "plan": plan.as_str(),
            "limits": limits,
            "used": {
                "templates": user.templates_count,
                "proposals": user.proposals_count,
                "contracts": user.contracts_count,
                "clients": user.clients_count,
                "boards": user.boards_count,
            },
        }),
    }))
}

async fn fetch_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}
