//! Payment and progress entry handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::payment::{
    ClientFilter, CreatePaymentRequest, CreateProgressRequest, Payment, ProgressEntry,
    ProgressQuery, UpdatePaymentRequest, UpdateProgressRequest,
};
use domain::services::billing;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth, ValidatedJson};

/// POST /api/payments
pub async fn create_payment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = billing::create_payment(&*state.storage, &session, request).await?;
    info!(
        payment_id = payment.id,
        client_id = payment.client_id,
        amount = payment.amount,
        "Payment recorded"
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Payments of one client when `client_id` is given, otherwise of every
/// client of the trainer.
///
/// GET /api/payments[?client_id=]
pub async fn list_payments(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(filter): QueryParams<ClientFilter>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(
        billing::list_payments(&*state.storage, &session, filter.client_id).await?,
    ))
}

/// PATCH /api/payments/:id
pub async fn update_payment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdatePaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    let payment = billing::update_payment(&*state.storage, &session, id, patch).await?;
    info!(payment_id = id, is_paid = payment.is_paid, "Payment updated");
    Ok(Json(payment))
}

/// DELETE /api/payments/:id
pub async fn delete_payment(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    billing::delete_payment(&*state.storage, &session, id).await?;
    info!(payment_id = id, "Payment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/progress
pub async fn create_progress(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateProgressRequest>,
) -> Result<(StatusCode, Json<ProgressEntry>), ApiError> {
    let entry = billing::create_progress(&*state.storage, &session, request).await?;
    info!(
        progress_id = entry.id,
        client_id = entry.client_id,
        "Progress recorded"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/progress?client_id=
pub async fn list_progress(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(query): QueryParams<ProgressQuery>,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    Ok(Json(
        billing::list_progress(&*state.storage, &session, query.client_id).await?,
    ))
}

/// PATCH /api/progress/:id
pub async fn update_progress(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateProgressRequest>,
) -> Result<Json<ProgressEntry>, ApiError> {
    let entry = billing::update_progress(&*state.storage, &session, id, patch).await?;
    info!(progress_id = id, "Progress updated");
    Ok(Json(entry))
}

/// DELETE /api/progress/:id
pub async fn delete_progress(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    billing::delete_progress(&*state.storage, &session, id).await?;
    info!(progress_id = id, "Progress deleted");
    Ok(StatusCode::NO_CONTENT)
}
