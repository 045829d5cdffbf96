//! Session token utilities using the HS256 algorithm.
//!
//! Authentication is performed by an external identity provider which signs
//! short-lived tokens with a shared secret. This service only verifies them and
//! turns the claims into a session. Token issuing exists for local development
//! and for tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Role carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Trainer,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainer => "trainer",
            Role::Client => "client",
        }
    }
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: numeric trainer id or client id, depending on `role`.
    pub sub: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

impl Claims {
    /// Parses the numeric subject id.
    pub fn subject_id(&self) -> Result<i64, JwtError> {
        self.sub.parse::<i64>().map_err(|_| JwtError::InvalidToken)
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, JwtError> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .ok_or(JwtError::InvalidToken)
    }
}

/// Keys and validation settings for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl SessionKeys {
    /// Creates keys from the shared HS256 secret.
    pub fn from_secret(secret: &str, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("Session secret cannot be empty".into()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
        })
    }

    /// Issues a token for the given subject, valid for `ttl_secs` seconds.
    ///
    /// A negative ttl produces an already-expired token.
    pub fn issue(&self, subject_id: i64, role: Role, ttl_secs: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            role,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::from_secret("test_secret_key_for_session_tokens", 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let keys = keys();
        let token = keys.issue(42, Role::Trainer, 3600).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.subject_id().unwrap(), 42);
        assert_eq!(claims.role, Role::Trainer);
        assert!(claims.expires_at().unwrap() > Utc::now());
    }

    #[test]
    fn test_verify_expired_token() {
        let keys = keys();
        let token = keys.issue(7, Role::Client, -120).unwrap();
        assert!(matches!(keys.verify(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let token = keys().issue(1, Role::Trainer, 3600).unwrap();
        let other = SessionKeys::from_secret("a_completely_different_secret", 0).unwrap();
        assert!(matches!(other.verify(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_verify_garbage() {
        assert!(keys().verify("not-a-token").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            SessionKeys::from_secret("", 30),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".into(),
            role: Role::Client,
            exp: 0,
            iat: 0,
            jti: "x".into(),
        };
        assert!(claims.subject_id().is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Trainer).unwrap(), "\"trainer\"");
        assert_eq!(Role::Client.as_str(), "client");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", keys());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test_secret"));
    }
}
