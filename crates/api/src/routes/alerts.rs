//! Trainer alert and branding handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::alert::{Alert, AlertQuery, CreateAlertRequest};
use domain::models::branding::{Branding, UpsertBrandingRequest};
use domain::services::alerts;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth, ValidatedJson};

/// POST /api/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateAlertRequest>,
) -> Result<(StatusCode, Json<Alert>), ApiError> {
    let alert = alerts::create_alert(&*state.storage, &session, request).await?;
    info!(alert_id = alert.id, "Alert created");
    Ok((StatusCode::CREATED, Json(alert)))
}

/// GET /api/alerts[?unread_only=true]
pub async fn list_alerts(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(query): QueryParams<AlertQuery>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    Ok(Json(
        alerts::list_alerts(&*state.storage, &session, query.unread_only).await?,
    ))
}

/// POST /api/alerts/:id/read
pub async fn mark_alert_read(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<Alert>, ApiError> {
    Ok(Json(alerts::mark_read(&*state.storage, &session, id).await?))
}

/// DELETE /api/alerts/:id
pub async fn delete_alert(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    alerts::delete_alert(&*state.storage, &session, id).await?;
    info!(alert_id = id, "Alert deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// The calling trainer's branding.
///
/// GET /api/branding
pub async fn get_branding(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Branding>, ApiError> {
    Ok(Json(alerts::get_branding(&*state.storage, &session).await?))
}

/// Branding of a trainer, readable by that trainer and their clients.
///
/// GET /api/branding/:trainer_id
pub async fn get_trainer_branding(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(trainer_id): Path<i64>,
) -> Result<Json<Branding>, ApiError> {
    Ok(Json(
        alerts::branding_for_trainer(&*state.storage, &session, trainer_id).await?,
    ))
}

/// POST /api/branding
pub async fn upsert_branding(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<UpsertBrandingRequest>,
) -> Result<Json<Branding>, ApiError> {
    let branding = alerts::upsert_branding(&*state.storage, &session, request).await?;
    info!(
        trainer_id = branding.trainer_id,
        message_tone = branding.message_tone.as_str(),
        "Branding saved"
    );
    Ok(Json(branding))
}
