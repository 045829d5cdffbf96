//! Explicit session context passed to every service call.

use chrono::{DateTime, Utc};
use shared::jwt::{Claims, JwtError, Role};

use crate::error::DomainError;

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Trainer id or client id, depending on `role`.
    pub subject_id: i64,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(subject_id: i64, role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            role,
            expires_at,
        }
    }

    /// Builds a session from verified token claims.
    pub fn from_claims(claims: &Claims) -> Result<Self, JwtError> {
        Ok(Self::new(claims.subject_id()?, claims.role, claims.expires_at()?))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    fn ensure_live(&self) -> Result<(), DomainError> {
        if self.is_expired() {
            return Err(DomainError::Unauthenticated("Session expired".into()));
        }
        Ok(())
    }

    /// Returns the trainer id, or fails unless this is a live trainer session.
    pub fn require_trainer(&self) -> Result<i64, DomainError> {
        self.ensure_live()?;
        match self.role {
            Role::Trainer => Ok(self.subject_id),
            Role::Client => Err(DomainError::Forbidden(
                "This operation requires a trainer session".into(),
            )),
        }
    }

    /// Returns the client id, or fails unless this is a live client session.
    pub fn require_client(&self) -> Result<i64, DomainError> {
        self.ensure_live()?;
        match self.role {
            Role::Client => Ok(self.subject_id),
            Role::Trainer => Err(DomainError::Forbidden(
                "This operation requires a client session".into(),
            )),
        }
    }
}
