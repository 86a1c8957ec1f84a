//! JWT verification and the authenticated-user extractors.
//!
//! Token issuance lives in the university's identity service; this layer
//! only verifies signatures and reads claims.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use labhub_core::config::AuthConfig;
use labhub_core::error::AppError;
use labhub_entity::user::UserRole;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried in a LabHub access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Username, for logging.
    pub username: String,
    /// The user's role.
    pub role: UserRole,
    /// Expiry (unix seconds).
    pub exp: usize,
}

/// Verifies bearer tokens against the shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish()
    }
}

impl JwtVerifier {
    /// Build a verifier from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::authentication(format!("Invalid token: {e}")))
    }
}

/// Extracted authenticated user, available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID from the token subject.
    pub user_id: Uuid,
    /// Username, for logging.
    pub username: String,
    /// Verified role.
    pub role: UserRole,
}

impl AuthUser {
    /// Fail with `Authorization` unless the user is lab staff.
    pub fn require_lab_staff(&self) -> Result<(), ApiError> {
        if self.role.is_lab_staff() {
            Ok(())
        } else {
            Err(AppError::authorization("Lab staff role required").into())
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| AppError::authentication("Invalid Authorization header"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;
    Ok(Some(token))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;
        let claims = state.jwt.verify(token)?;
        Ok(claims.into())
    }
}

/// Like [`AuthUser`] but absent when no Authorization header was sent.
///
/// A header that is present but invalid is still rejected; anonymous is
/// allowed, a bad token is not.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(Self(None)),
            Some(token) => {
                let claims = state.jwt.verify(token)?;
                Ok(Self(Some(claims.into())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn token(secret: &str, role: UserRole, exp_offset: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "staff1".to_string(),
            role,
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trips_claims() {
        let verifier = JwtVerifier::new(&config());
        let claims = verifier
            .verify(&token("test-secret", UserRole::Staff, 3600))
            .unwrap();
        assert_eq!(claims.role, UserRole::Staff);
        assert_eq!(claims.username, "staff1");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = JwtVerifier::new(&config());
        assert!(verifier
            .verify(&token("other-secret", UserRole::Staff, 3600))
            .is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = JwtVerifier::new(&config());
        assert!(verifier
            .verify(&token("test-secret", UserRole::Staff, -3600))
            .is_err());
    }

    #[test]
    fn test_student_is_not_lab_staff() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            username: "s".to_string(),
            role: UserRole::Student,
        };
        assert!(user.require_lab_staff().is_err());
    }
}
