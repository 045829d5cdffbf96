//! Trainer account registration and lookup.

use crate::error::DomainError;
use crate::models::user::{CreateUserRequest, NewUser, UserResponse};
use crate::session::Session;
use crate::storage::Storage;

/// Registers a trainer profile. Duplicate usernames or emails conflict.
pub async fn register(
    storage: &dyn Storage,
    req: CreateUserRequest,
) -> Result<UserResponse, DomainError> {
    let password_hash = shared::password::hash_password(&req.password)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let user = storage
        .create_user(NewUser {
            username: req.username.trim().to_string(),
            password_hash,
            name: req.name,
            email: req.email.to_lowercase(),
            avatar_url: req.avatar_url,
        })
        .await?;
    Ok(user.into())
}

/// A trainer may read only their own account.
pub async fn get(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<UserResponse, DomainError> {
    let trainer_id = session.require_trainer()?;
    if trainer_id != id {
        return Err(DomainError::NotFound("User"));
    }
    storage
        .get_user(id)
        .await?
        .map(UserResponse::from)
        .ok_or(DomainError::NotFound("User"))
}
