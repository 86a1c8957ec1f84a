//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::dto::request::WsQuery;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /ws?token={jwt}, the WebSocket upgrade.
///
/// Browsers cannot set an Authorization header on the upgrade request,
/// so the token travels as a query parameter and is verified before the
/// upgrade completes.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> ApiResult<Response> {
    let user: AuthUser = state.jwt.verify(&query.token)?.into();
    Ok(ws.on_upgrade(move |socket| handle_connection(state, user, socket)))
}

/// Drives an established WebSocket connection.
async fn handle_connection(state: AppState, user: AuthUser, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) =
        state
            .connections
            .register(user.user_id, user.role, user.username.clone());
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %user.user_id, "WebSocket connection established");

    // Forward queued outbound messages onto the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Server-driven keepalive; exits when the connection dies.
    let keepalive_task = tokio::spawn({
        let keepalive = state.keepalive.clone();
        let handle = handle.clone();
        async move { keepalive.run(handle).await }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.connections.handle_inbound(&conn_id, &text).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    keepalive_task.abort();
    state.connections.unregister(&conn_id);

    info!(conn_id = %conn_id, user_id = %user.user_id, "WebSocket connection closed");
}
