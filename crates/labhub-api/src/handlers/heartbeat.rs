//! Heartbeat ingestion and session termination endpoints.

use axum::extract::State;
use axum::Json;

use labhub_core::error::AppError;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::dto::request::{EndSessionBody, HeartbeatBody};
use crate::dto::response::HeartbeatResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/heartbeat
///
/// Anonymous heartbeats are accepted (kiosk machines without a logged-in
/// user); a bearer token, when present, attributes the session to that
/// user.
pub async fn post_heartbeat(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(body): Json<HeartbeatBody>,
) -> ApiResult<Json<HeartbeatResponse>> {
    let request = body.into_request(user.map(|u| u.user_id))?;
    let outcome = state.heartbeats.process(request).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/heartbeat/end
pub async fn end_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<EndSessionBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let session_key = body
        .session_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("session_key"))?;
    state
        .heartbeats
        .end_session(&session_key, user.user_id)
        .await?;
    Ok(Json(serde_json::json!({ "ended": true })))
}
