//! Fitness and nutrition plan assignment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::fitness_plan::{AssignFitnessPlanRequest, FitnessPlan, FitnessPlanDetails};
use domain::models::nutrition_plan::{
    CreateNutritionPlanRequest, NutritionPlan, NutritionPlanDetails,
};
use domain::services::assignments;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{SessionAuth, ValidatedJson};

/// Assign a fitness plan to a client, optionally copying a template's items.
///
/// POST /api/fitness-plans
pub async fn assign_fitness_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<AssignFitnessPlanRequest>,
) -> Result<(StatusCode, Json<FitnessPlanDetails>), ApiError> {
    let details = assignments::assign_fitness_plan(&*state.storage, &session, request).await?;
    info!(
        fitness_plan_id = details.plan.id,
        client_id = details.plan.client_id,
        items = details.items.len(),
        "Fitness plan assigned"
    );
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/clients/:id/fitness-plans
pub async fn list_fitness_plans(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<FitnessPlan>>, ApiError> {
    Ok(Json(
        assignments::list_fitness_plans(&*state.storage, &session, client_id).await?,
    ))
}

/// GET /api/fitness-plans/:id
pub async fn get_fitness_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<FitnessPlanDetails>, ApiError> {
    Ok(Json(
        assignments::get_fitness_plan(&*state.storage, &session, id).await?,
    ))
}

/// DELETE /api/fitness-plans/:id
pub async fn delete_fitness_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    assignments::delete_fitness_plan(&*state.storage, &session, id).await?;
    info!(fitness_plan_id = id, "Fitness plan deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/nutrition-plans
pub async fn create_nutrition_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateNutritionPlanRequest>,
) -> Result<(StatusCode, Json<NutritionPlanDetails>), ApiError> {
    let details = assignments::create_nutrition_plan(&*state.storage, &session, request).await?;
    info!(
        nutrition_plan_id = details.plan.id,
        client_id = details.plan.client_id,
        meals = details.items.len(),
        "Nutrition plan created"
    );
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/clients/:id/nutrition-plans
pub async fn list_nutrition_plans(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<NutritionPlan>>, ApiError> {
    Ok(Json(
        assignments::list_nutrition_plans(&*state.storage, &session, client_id).await?,
    ))
}

/// GET /api/nutrition-plans/:id
pub async fn get_nutrition_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<NutritionPlanDetails>, ApiError> {
    Ok(Json(
        assignments::get_nutrition_plan(&*state.storage, &session, id).await?,
    ))
}

/// DELETE /api/nutrition-plans/:id
pub async fn delete_nutrition_plan(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    assignments::delete_nutrition_plan(&*state.storage, &session, id).await?;
    info!(nutrition_plan_id = id, "Nutrition plan deleted");
    Ok(StatusCode::NO_CONTENT)
}
