//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .is_ok();

    let (status, body) = if database_ok {
        (
            StatusCode::OK,
            HealthResponse {
                status: "ok",
                database: "ok",
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                database: "unreachable",
            },
        )
    };
    (status, Json(body))
}
