//! Client roster management.

use crate::error::DomainError;
use crate::models::client::{Client, CreateClientRequest, NewClient, UpdateClientRequest};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

pub async fn create(
    storage: &dyn Storage,
    session: &Session,
    req: CreateClientRequest,
) -> Result<Client, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage
        .create_client(NewClient::from_request(trainer_id, req))
        .await?)
}

pub async fn list(storage: &dyn Storage, session: &Session) -> Result<Vec<Client>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_clients(trainer_id).await?)
}

/// Visible to the owning trainer and to the client themself.
pub async fn get(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<Client, DomainError> {
    access::readable_client(storage, session, id).await
}

pub async fn update(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdateClientRequest,
) -> Result<Client, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, id).await?;
    storage
        .update_client(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Client"))
}

/// Soft delete: the client stays on record but is marked inactive.
pub async fn archive(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<Client, DomainError> {
    let patch = UpdateClientRequest {
        is_active: Some(false),
        ..Default::default()
    };
    update(storage, session, id, patch).await
}

/// Hard delete, removing the client's dependent records as well.
pub async fn delete(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, id).await?;
    if storage.delete_client(id).await? {
        Ok(())
    } else {
        Err(DomainError::NotFound("Client"))
    }
}
