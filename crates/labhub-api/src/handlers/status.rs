//! Derived status read endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use labhub_service::heartbeat::{ComputerStatusDetail, RoomSummary};

use crate::dto::request::RoomStatusQuery;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/status/rooms
pub async fn room_status(
    State(state): State<AppState>,
    Query(query): Query<RoomStatusQuery>,
) -> ApiResult<Json<Vec<RoomSummary>>> {
    let summaries = state
        .aggregator
        .room_summaries(query.room_id, query.include_computers)
        .await?;
    Ok(Json(summaries))
}

/// GET /api/status/computers/{id}
pub async fn computer_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ComputerStatusDetail>> {
    let detail = state.aggregator.computer_detail(id).await?;
    Ok(Json(detail))
}
