//! Route definitions for the LabHub HTTP API.
//!
//! All HTTP routes are mounted under `/api`; the WebSocket upgrade lives
//! at `/ws`. The router receives `AppState` and passes it to all handlers
//! via axum's `State` extractor.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/heartbeat", post(handlers::heartbeat::post_heartbeat))
        .route("/heartbeat/end", post(handlers::heartbeat::end_session))
        .route("/status/rooms", get(handlers::status::room_status))
        .route(
            "/status/computers/{id}",
            get(handlers::status::computer_status),
        )
        .route(
            "/computers/register",
            post(handlers::computers::register_computer),
        )
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
