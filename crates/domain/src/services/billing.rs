//! Payments and free-form progress tracking.

use crate::error::DomainError;
use crate::models::payment::{
    CreatePaymentRequest, CreateProgressRequest, NewPayment, NewProgressEntry, Payment,
    ProgressEntry, UpdatePaymentRequest, UpdateProgressRequest,
};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

pub async fn create_payment(
    storage: &dyn Storage,
    session: &Session,
    req: CreatePaymentRequest,
) -> Result<Payment, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;
    Ok(storage.create_payment(NewPayment::from(req)).await?)
}

/// Payments of one client, or of every client of the trainer.
pub async fn list_payments(
    storage: &dyn Storage,
    session: &Session,
    client_id: Option<i64>,
) -> Result<Vec<Payment>, DomainError> {
    let trainer_id = session.require_trainer()?;
    match client_id {
        Some(client_id) => {
            access::trainer_client(storage, trainer_id, client_id).await?;
            Ok(storage.list_payments_for_client(client_id).await?)
        }
        None => Ok(storage.list_payments_for_trainer(trainer_id).await?),
    }
}

pub async fn update_payment(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdatePaymentRequest,
) -> Result<Payment, DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_payment(id).await?;
    access::via_client(storage, trainer_id, record, "Payment", |p| p.client_id).await?;
    storage
        .update_payment(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Payment"))
}

pub async fn delete_payment(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_payment(id).await?;
    access::via_client(storage, trainer_id, record, "Payment", |p| p.client_id).await?;
    storage.delete_payment(id).await?;
    Ok(())
}

fn normalize_metrics(value: serde_json::Value) -> Result<serde_json::Value, DomainError> {
    shared::validation::normalize_json_object(Some(value))
        .map_err(|e| DomainError::at_field("metrics", e))
}

pub async fn create_progress(
    storage: &dyn Storage,
    session: &Session,
    req: CreateProgressRequest,
) -> Result<ProgressEntry, DomainError> {
    let trainer_id = session.require_trainer()?;
    let metrics = normalize_metrics(req.metrics)?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;
    Ok(storage
        .create_progress(NewProgressEntry {
            client_id: req.client_id,
            date: req.date.unwrap_or_else(chrono::Utc::now),
            metrics,
            notes: req.notes,
        })
        .await?)
}

pub async fn list_progress(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
) -> Result<Vec<ProgressEntry>, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::trainer_client(storage, trainer_id, client_id).await?;
    Ok(storage.list_progress(client_id).await?)
}

pub async fn update_progress(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    mut patch: UpdateProgressRequest,
) -> Result<ProgressEntry, DomainError> {
    let trainer_id = session.require_trainer()?;
    if let Some(metrics) = patch.metrics.take() {
        patch.metrics = Some(normalize_metrics(metrics)?);
    }
    let record = storage.get_progress(id).await?;
    access::via_client(storage, trainer_id, record, "Progress entry", |p| p.client_id).await?;
    storage
        .update_progress(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Progress entry"))
}

pub async fn delete_progress(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    let record = storage.get_progress(id).await?;
    access::via_client(storage, trainer_id, record, "Progress entry", |p| p.client_id).await?;
    storage.delete_progress(id).await?;
    Ok(())
}
