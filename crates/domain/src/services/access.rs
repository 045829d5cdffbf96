//! Ownership checks shared by the services.
//!
//! A record that exists but belongs to someone else is reported as not found.

use shared::jwt::Role;

use crate::error::DomainError;
use crate::models::client::Client;
use crate::session::Session;
use crate::storage::Storage;

/// Loads a client owned by `trainer_id`.
pub async fn trainer_client(
    storage: &dyn Storage,
    trainer_id: i64,
    client_id: i64,
) -> Result<Client, DomainError> {
    match storage.get_client(client_id).await? {
        Some(client) if client.trainer_id == trainer_id => Ok(client),
        _ => Err(DomainError::NotFound("Client")),
    }
}

/// Loads a client the session may read: one of the trainer's clients, or
/// the client behind a client session.
pub async fn readable_client(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Client, DomainError> {
    match session.role {
        Role::Trainer => {
            let trainer_id = session.require_trainer()?;
            trainer_client(storage, trainer_id, client_id).await
        }
        Role::Client => {
            let own_id = session.require_client()?;
            if own_id != client_id {
                return Err(DomainError::NotFound("Client"));
            }
            storage
                .get_client(client_id)
                .await?
                .ok_or(DomainError::NotFound("Client"))
        }
    }
}

/// Keeps a record only if its client belongs to `trainer_id`.
pub async fn via_client<T>(
    storage: &dyn Storage,
    trainer_id: i64,
    record: Option<T>,
    entity: &'static str,
    client_id: impl FnOnce(&T) -> i64,
) -> Result<T, DomainError> {
    let record = record.ok_or(DomainError::NotFound(entity))?;
    match storage.get_client(client_id(&record)).await? {
        Some(client) if client.trainer_id == trainer_id => Ok(record),
        _ => Err(DomainError::NotFound(entity)),
    }
}

/// Keeps a record only if `owned` holds for it.
pub fn owned<T>(
    record: Option<T>,
    entity: &'static str,
    owned: impl FnOnce(&T) -> bool,
) -> Result<T, DomainError> {
    match record {
        Some(r) if owned(&r) => Ok(r),
        _ => Err(DomainError::NotFound(entity)),
    }
}
