//! Body measurement and goal endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::measurement::{
    CreateGoalRequest, CreateMeasurementRequest, GoalResponse, Measurement, SeriesPoint,
    SeriesQuery, UpdateGoalRequest,
};
use domain::services::tracking;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth, ValidatedJson};

/// GET /api/clients/:id/measurements
pub async fn list_measurements(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    Ok(Json(
        tracking::list_measurements(&*state.storage, &session, client_id).await?,
    ))
}

/// POST /api/clients/:id/measurements
pub async fn create_measurement(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CreateMeasurementRequest>,
) -> Result<(StatusCode, Json<Measurement>), ApiError> {
    let measurement =
        tracking::create_measurement(&*state.storage, &session, client_id, request).await?;
    info!(
        measurement_id = measurement.id,
        client_id = measurement.client_id,
        "Measurement recorded"
    );
    Ok((StatusCode::CREATED, Json(measurement)))
}

/// One metric over time, for charts.
///
/// GET /api/clients/:id/measurements/series?metric=weight_kg
pub async fn measurement_series(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
    QueryParams(query): QueryParams<SeriesQuery>,
) -> Result<Json<Vec<SeriesPoint>>, ApiError> {
    Ok(Json(
        tracking::measurement_series(&*state.storage, &session, client_id, query.metric).await?,
    ))
}

/// DELETE /api/measurements/:id
pub async fn delete_measurement(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracking::delete_measurement(&*state.storage, &session, id).await?;
    info!(measurement_id = id, "Measurement deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/clients/:id/goals
pub async fn list_goals(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    Ok(Json(
        tracking::list_goals(&*state.storage, &session, client_id).await?,
    ))
}

/// POST /api/clients/:id/goals
pub async fn create_goal(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
    ValidatedJson(request): ValidatedJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), ApiError> {
    let goal = tracking::create_goal(&*state.storage, &session, client_id, request).await?;
    info!(goal_id = goal.goal.id, client_id, "Goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

/// PATCH /api/goals/:id
pub async fn update_goal(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal = tracking::update_goal(&*state.storage, &session, id, patch).await?;
    info!(goal_id = id, "Goal updated");
    Ok(Json(goal))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    tracking::delete_goal(&*state.storage, &session, id).await?;
    info!(goal_id = id, "Goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me/measurements
pub async fn my_measurements(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    let client_id = session.require_client()?;
    Ok(Json(
        tracking::list_measurements(&*state.storage, &session, client_id).await?,
    ))
}

/// GET /api/me/goals
pub async fn my_goals(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let client_id = session.require_client()?;
    Ok(Json(
        tracking::list_goals(&*state.storage, &session, client_id).await?,
    ))
}
