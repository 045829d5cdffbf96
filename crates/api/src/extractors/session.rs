//! Session extractor.
//!
//! Verifies the Bearer token in the Authorization header and turns its
//! claims into the [`Session`] passed to every domain service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use domain::Session;
use shared::jwt::{JwtError, SessionKeys};

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct SessionAuth(pub Session);

impl SessionAuth {
    /// Verifies `token` and builds a live session from it.
    pub fn from_token(keys: &SessionKeys, token: &str) -> Result<Self, ApiError> {
        let claims = keys.verify(token).map_err(|e| match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Session expired".to_string()),
            _ => ApiError::Unauthorized("Invalid session token".to_string()),
        })?;
        let session = Session::from_claims(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid session token".to_string()))?;

        // Tokens inside the verification leeway are still rejected here
        if session.is_expired() {
            return Err(ApiError::Unauthorized("Session expired".to_string()));
        }
        Ok(Self(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
                })?;

        Self::from_token(&state.keys, bearer.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::jwt::Role;

    fn keys() -> SessionKeys {
        SessionKeys::from_secret("extractor-test-secret", 0).unwrap()
    }

    #[test]
    fn test_valid_token_builds_session() {
        let keys = keys();
        let token = keys.issue(42, Role::Trainer, 3600).unwrap();
        let SessionAuth(session) = SessionAuth::from_token(&keys, &token).unwrap();
        assert_eq!(session.subject_id, 42);
        assert_eq!(session.role, Role::Trainer);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let token = keys.issue(42, Role::Client, -120).unwrap();
        match SessionAuth::from_token(&keys, &token) {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Session expired"),
            other => panic!("Expected expired session, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = SessionKeys::from_secret("someone-else", 0).unwrap();
        let token = other.issue(1, Role::Trainer, 3600).unwrap();
        match SessionAuth::from_token(&keys(), &token) {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Invalid session token"),
            other => panic!("Expected invalid token, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            SessionAuth::from_token(&keys(), "not-a-jwt"),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
