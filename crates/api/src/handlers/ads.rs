//! Handlers for the ads-metrics integration: OAuth connect/callback,
//! connection status, disconnect, and daily metric snapshots.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use countersign_core::token;
use countersign_db::models::ads::{AdSnapshot, SnapshotInput};
use countersign_db::repositories::AdsRepo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::activity::{self, actions};
use crate::config::AdsConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters delivered to the OAuth callback by the provider.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// `?from=&to=` snapshot date filter.
#[derive(Debug, Deserialize)]
pub struct SnapshotParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Token-exchange response from the provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    account_id: String,
}

/// One day of metrics as returned by the provider's daily endpoint.
#[derive(Debug, Deserialize)]
struct ProviderDailyMetrics {
    date: NaiveDate,
    impressions: i64,
    clicks: i64,
    spend_cents: i64,
}

/// Response for the connect endpoint: where to send the browser.
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub redirect_url: String,
}

fn ads_config(state: &AppState) -> AppResult<&AdsConfig> {
    state
        .config
        .ads
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Ads integration is not configured".into()))
}

/// GET /api/v1/integrations/ads/connect
///
/// Build the provider authorization URL with a fresh `state` token bound to
/// the requesting user.
pub async fn connect(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ConnectResponse>>> {
    let ads = ads_config(&state)?;

    let oauth_state = token::oauth_state();
    AdsRepo::upsert_oauth_state(&state.pool, auth.user_id, &oauth_state).await?;

    let redirect_url = reqwest::Url::parse_with_params(
        &ads.authorize_url,
        &[
            ("response_type", "code"),
            ("client_id", ads.client_id.as_str()),
            ("redirect_uri", ads.redirect_url.as_str()),
            ("state", oauth_state.as_str()),
        ],
    )
    .map_err(|e| AppError::InternalError(format!("Invalid authorize URL: {e}")))?;

    Ok(Json(DataResponse {
        data: ConnectResponse {
            redirect_url: redirect_url.into(),
        },
    }))
}

/// GET /api/v1/integrations/ads/callback
///
/// Provider redirect target: validates `state`, exchanges the code for an
/// access token, and persists the connected account id.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Json<DataResponse<Value>>> {
    let ads = ads_config(&state)?;

    let account = AdsRepo::find_by_oauth_state(&state.pool, &params.state)
        .await?
        .ok_or_else(|| AppError::BadRequest("Unknown or expired OAuth state".into()))?;

    let response = state
        .http
        .post(&ads.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", params.code.as_str()),
            ("client_id", ads.client_id.as_str()),
            ("client_secret", ads.client_secret.as_str()),
            ("redirect_uri", ads.redirect_url.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Ads token exchange request failed");
            AppError::InternalError("Token exchange with the ads provider failed".into())
        })?;

    if !response.status().is_success() {
        tracing::error!(status = %response.status(), "Ads token exchange rejected");
        return Err(AppError::BadRequest(
            "The ads provider rejected the authorization code".into(),
        ));
    }

    let tokens: TokenResponse = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "Ads token exchange returned malformed JSON");
        AppError::InternalError("Token exchange with the ads provider failed".into())
    })?;

    let connected = AdsRepo::mark_connected(
        &state.pool,
        account.id,
        &tokens.account_id,
        &tokens.access_token,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| AppError::InternalError("Ads account row vanished mid-callback".into()))?;

    tracing::info!(
        user_id = connected.user_id,
        provider_account_id = %tokens.account_id,
        "Ads account connected",
    );
    activity::record(
        &state.pool,
        connected.user_id,
        actions::CONNECT,
        "ads_account",
        Some(connected.id),
        None,
    )
    .await;

    Ok(Json(DataResponse {
        data: json!({ "connected": true, "account_id": tokens.account_id }),
    }))
}

/// GET /api/v1/integrations/ads/status
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Value>>> {
    let account = AdsRepo::find_by_user(&state.pool, auth.user_id).await?;
    let data = match account {
        Some(account) if account.is_connected() => json!({
            "connected": true,
            "account_id": account.provider_account_id,
            "connected_at": account.connected_at,
        }),
        _ => json!({ "connected": false }),
    };
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/integrations/ads
///
/// Disconnect; snapshots are dropped with the account.
pub async fn disconnect(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let removed = AdsRepo::disconnect(&state.pool, auth.user_id).await?;
    if !removed {
        return Err(AppError::NotFound("No ads account is connected".into()));
    }

    tracing::info!(user_id = auth.user_id, "Ads account disconnected");
    activity::record(
        &state.pool,
        auth.user_id,
        actions::DISCONNECT,
        "ads_account",
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/integrations/ads/snapshots
pub async fn list_snapshots(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SnapshotParams>,
) -> AppResult<Json<DataResponse<Vec<AdSnapshot>>>> {
    let snapshots =
        AdsRepo::list_snapshots(&state.pool, auth.user_id, params.from, params.to).await?;
    Ok(Json(DataResponse { data: snapshots }))
}

/// POST /api/v1/integrations/ads/snapshots/refresh
///
/// Pull current daily metrics from the provider and upsert snapshot rows,
/// keyed on (account, date).
pub async fn refresh_snapshots(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Value>>> {
    let ads = ads_config(&state)?;

    let account = AdsRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .filter(|a| a.is_connected())
        .ok_or_else(|| AppError::BadRequest("No ads account is connected".into()))?;

    let provider_account_id = account
        .provider_account_id
        .as_deref()
        .ok_or_else(|| AppError::InternalError("Connected account has no provider id".into()))?;
    let access_token = account
        .access_token
        .as_deref()
        .ok_or_else(|| AppError::InternalError("Connected account has no access token".into()))?;

    let url = format!("{}/accounts/{provider_account_id}/metrics/daily", ads.api_base_url);
    let response = state
        .http
        .get(&url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Ads metrics pull failed");
            AppError::InternalError("Metrics pull from the ads provider failed".into())
        })?;

    if !response.status().is_success() {
        tracing::error!(status = %response.status(), "Ads metrics pull rejected");
        return Err(AppError::InternalError(
            "Metrics pull from the ads provider failed".into(),
        ));
    }

    let days: Vec<ProviderDailyMetrics> = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "Ads metrics response was malformed");
        AppError::InternalError("Metrics pull from the ads provider failed".into())
    })?;

    let mut refreshed = 0usize;
    for day in &days {
        AdsRepo::upsert_snapshot(
            &state.pool,
            account.id,
            &SnapshotInput {
                snapshot_date: day.date,
                impressions: day.impressions,
                clicks: day.clicks,
                spend_cents: day.spend_cents,
            },
        )
        .await?;
        refreshed += 1;
    }

    tracing::info!(user_id = auth.user_id, refreshed, "Ad snapshots refreshed");

    Ok(Json(DataResponse {
        data: json!({ "refreshed": refreshed }),
    }))
}
