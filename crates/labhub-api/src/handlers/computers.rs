//! Computer registration endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use labhub_core::error::AppError;
use labhub_entity::computer::Computer;

use crate::auth::AuthUser;
use crate::dto::request::RegisterComputerBody;
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/computers/register (lab staff only)
pub async fn register_computer(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    Json(body): Json<RegisterComputerBody>,
) -> ApiResult<(StatusCode, Json<Computer>)> {
    user.require_lab_staff()?;

    let name = body
        .name
        .ok_or_else(|| AppError::missing_field("name"))?;
    let client_ip = client_ip(&headers);

    let computer = state
        .registration
        .register(&name, body.room_id, body.mac_address, client_ip.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(computer)))
}

/// The client address as seen through the reverse proxy.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.4.17, 172.16.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), Some("10.0.4.17".to_string()));
    }

    #[test]
    fn test_client_ip_absent_header() {
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
