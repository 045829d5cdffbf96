//! Appointment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::appointment::{
    Appointment, AppointmentWithClient, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use domain::services::appointments;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{SessionAuth, ValidatedJson};

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = appointments::create(&*state.storage, &session, request).await?;
    info!(
        appointment_id = appointment.id,
        client_id = appointment.client_id,
        start_time = %appointment.start_time,
        "Appointment scheduled"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Every appointment of the trainer with the client's name, by start time.
///
/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<AppointmentWithClient>>, ApiError> {
    Ok(Json(appointments::list(&*state.storage, &session).await?))
}

/// PATCH /api/appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = appointments::update(&*state.storage, &session, id, patch).await?;
    info!(
        appointment_id = id,
        status = appointment.status.as_str(),
        "Appointment updated"
    );
    Ok(Json(appointment))
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    appointments::delete(&*state.storage, &session, id).await?;
    info!(appointment_id = id, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}
