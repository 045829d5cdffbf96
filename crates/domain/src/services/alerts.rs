//! Trainer alerts and branding.

use shared::jwt::Role;

use crate::error::DomainError;
use crate::models::alert::{Alert, CreateAlertRequest, NewAlert};
use crate::models::branding::{Branding, UpsertBrandingRequest};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

pub async fn create_alert(
    storage: &dyn Storage,
    session: &Session,
    req: CreateAlertRequest,
) -> Result<Alert, DomainError> {
    let trainer_id = session.require_trainer()?;
    if let Some(client_id) = req.client_id {
        access::trainer_client(storage, trainer_id, client_id).await?;
    }
    Ok(storage
        .create_alert(NewAlert {
            trainer_id,
            client_id: req.client_id,
            title: req.title,
            message: req.message,
        })
        .await?)
}

pub async fn list_alerts(
    storage: &dyn Storage,
    session: &Session,
    unread_only: bool,
) -> Result<Vec<Alert>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_alerts(trainer_id, unread_only).await?)
}

pub async fn mark_read(storage: &dyn Storage, session: &Session, id: i64) -> Result<Alert, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::owned(storage.get_alert(id).await?, "Alert", |a| a.trainer_id == trainer_id)?;
    storage
        .mark_alert_read(id)
        .await?
        .ok_or(DomainError::NotFound("Alert"))
}

pub async fn delete_alert(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    access::owned(storage.get_alert(id).await?, "Alert", |a| a.trainer_id == trainer_id)?;
    storage.delete_alert(id).await?;
    Ok(())
}

/// The session trainer's branding.
pub async fn get_branding(storage: &dyn Storage, session: &Session) -> Result<Branding, DomainError> {
    let trainer_id = session.require_trainer()?;
    storage
        .get_branding(trainer_id)
        .await?
        .ok_or(DomainError::NotFound("Branding"))
}

/// Branding of the trainer a client belongs to. Trainers may only read their own.
pub async fn branding_for_trainer(
    storage: &dyn Storage,
    session: &Session,
    trainer_id: i64,
) -> Result<Branding, DomainError> {
    let allowed = match session.role {
        Role::Client => storage
            .get_client(session.require_client()?)
            .await?
            .is_some_and(|c| c.trainer_id == trainer_id),
        Role::Trainer => session.require_trainer()? == trainer_id,
    };
    if !allowed {
        return Err(DomainError::NotFound("Branding"));
    }
    storage
        .get_branding(trainer_id)
        .await?
        .ok_or(DomainError::NotFound("Branding"))
}

pub async fn upsert_branding(
    storage: &dyn Storage,
    session: &Session,
    req: UpsertBrandingRequest,
) -> Result<Branding, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.upsert_branding(trainer_id, &req).await?)
}
