//! Workout plan template handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::plan_template::{
    PlanBuilderView, PlanTemplate, PlanTemplateDetails, SavePlanTemplateRequest,
};
use domain::services::plan_templates;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{SessionAuth, ValidatedJson};

/// Create a template with its items.
///
/// POST /api/plan-templates
pub async fn create_plan_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<SavePlanTemplateRequest>,
) -> Result<(StatusCode, Json<PlanTemplateDetails>), ApiError> {
    let details = plan_templates::create(&*state.storage, &session, request).await?;
    info!(
        plan_template_id = details.template.id,
        items = details.items.len(),
        "Plan template created"
    );
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/plan-templates
pub async fn list_plan_templates(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<PlanTemplate>>, ApiError> {
    Ok(Json(plan_templates::list(&*state.storage, &session).await?))
}

/// Template with items and their resolved exercises.
///
/// GET /api/plan-templates/:id
pub async fn get_plan_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<PlanTemplateDetails>, ApiError> {
    Ok(Json(plan_templates::get(&*state.storage, &session, id).await?))
}

/// Items grouped by day for the plan builder.
///
/// GET /api/plan-templates/:id/builder
pub async fn plan_builder(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<PlanBuilderView>, ApiError> {
    Ok(Json(
        plan_templates::builder_view(&*state.storage, &session, id).await?,
    ))
}

/// Saves the header and replaces every item.
///
/// PUT /api/plan-templates/:id
pub async fn update_plan_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<SavePlanTemplateRequest>,
) -> Result<Json<PlanTemplateDetails>, ApiError> {
    let details = plan_templates::update(&*state.storage, &session, id, request).await?;
    info!(
        plan_template_id = id,
        items = details.items.len(),
        "Plan template saved"
    );
    Ok(Json(details))
}

/// DELETE /api/plan-templates/:id
pub async fn delete_plan_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    plan_templates::delete(&*state.storage, &session, id).await?;
    info!(plan_template_id = id, "Plan template deleted");
    Ok(StatusCode::NO_CONTENT)
}
