//! Trainer appointments.

use crate::error::DomainError;
use crate::models::appointment::{
    check_window, Appointment, AppointmentWithClient, CreateAppointmentRequest, NewAppointment,
    UpdateAppointmentRequest,
};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

async fn own_appointment(
    storage: &dyn Storage,
    trainer_id: i64,
    id: i64,
) -> Result<Appointment, DomainError> {
    access::owned(storage.get_appointment(id).await?, "Appointment", |a| {
        a.trainer_id == trainer_id
    })
}

pub async fn create(
    storage: &dyn Storage,
    session: &Session,
    req: CreateAppointmentRequest,
) -> Result<Appointment, DomainError> {
    let trainer_id = session.require_trainer()?;
    check_window(req.start_time, req.end_time)?;
    access::trainer_client(storage, trainer_id, req.client_id).await?;
    Ok(storage
        .create_appointment(NewAppointment {
            trainer_id,
            client_id: req.client_id,
            title: req.title,
            description: req.description,
            appointment_type: req.appointment_type,
            start_time: req.start_time,
            end_time: req.end_time,
            status: req.status,
        })
        .await?)
}

/// Every appointment of the trainer with the client's name, by start time.
pub async fn list(
    storage: &dyn Storage,
    session: &Session,
) -> Result<Vec<AppointmentWithClient>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_appointments_for_trainer(trainer_id).await?)
}

/// Applies a partial update, re-checking the time window against the
/// merged result.
pub async fn update(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    patch: UpdateAppointmentRequest,
) -> Result<Appointment, DomainError> {
    let trainer_id = session.require_trainer()?;
    let mut merged = own_appointment(storage, trainer_id, id).await?;
    merged.apply(&patch);
    check_window(merged.start_time, merged.end_time)?;
    storage
        .update_appointment(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Appointment"))
}

pub async fn delete(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    own_appointment(storage, trainer_id, id).await?;
    storage.delete_appointment(id).await?;
    Ok(())
}
