//! Free-form plan and client plan assignment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::plan::{
    ClientPlan, ClientPlanQuery, CreateClientPlanRequest, CreatePlanRequest, Plan,
    UpdateClientPlanRequest, UpdatePlanRequest,
};
use domain::services::plans;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, SessionAuth, ValidatedJson};

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>), ApiError> {
    let plan = plans::create_plan(&*state.storage, &session, request).await?;
    info!(plan_id = plan.id, plan_type = plan.plan_type.as_str(), "Plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Newest first.
///
/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<Plan>>, ApiError> {
    Ok(Json(plans::list_plans(&*state.storage, &session).await?))
}

/// GET /api/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<Plan>, ApiError> {
    Ok(Json(plans::get_plan(&*state.storage, &session, id).await?))
}

/// PATCH /api/plans/:id
pub async fn update_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdatePlanRequest>,
) -> Result<Json<Plan>, ApiError> {
    let plan = plans::update_plan(&*state.storage, &session, id, patch).await?;
    info!(plan_id = id, "Plan updated");
    Ok(Json(plan))
}

/// DELETE /api/plans/:id
pub async fn delete_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    plans::delete_plan(&*state.storage, &session, id).await?;
    info!(plan_id = id, "Plan deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/client-plans
pub async fn assign_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateClientPlanRequest>,
) -> Result<(StatusCode, Json<ClientPlan>), ApiError> {
    let assignment = plans::assign_plan(&*state.storage, &session, request).await?;
    info!(
        client_plan_id = assignment.id,
        client_id = assignment.client_id,
        plan_id = assignment.plan_id,
        "Plan assigned to client"
    );
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// GET /api/client-plans?client_id=
pub async fn list_client_plans(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    QueryParams(query): QueryParams<ClientPlanQuery>,
) -> Result<Json<Vec<ClientPlan>>, ApiError> {
    Ok(Json(
        plans::list_client_plans(&*state.storage, &session, query.client_id).await?,
    ))
}

/// PATCH /api/client-plans/:id
pub async fn update_client_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(patch): ValidatedJson<UpdateClientPlanRequest>,
) -> Result<Json<ClientPlan>, ApiError> {
    let assignment = plans::update_client_plan(&*state.storage, &session, id, patch).await?;
    info!(client_plan_id = id, "Client plan updated");
    Ok(Json(assignment))
}

/// DELETE /api/client-plans/:id
pub async fn delete_client_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    plans::delete_client_plan(&*state.storage, &session, id).await?;
    info!(client_plan_id = id, "Client plan removed");
    Ok(StatusCode::NO_CONTENT)
}
