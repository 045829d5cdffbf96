//! Exercise library handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::exercise::{
    CreateExerciseTemplateRequest, ExerciseTemplate, UpdateExerciseTemplateRequest,
};
use domain::services::exercises;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{SessionAuth, ValidatedJson};

/// Own templates first, then global ones, each ordered by name.
///
/// GET /api/exercise-templates
pub async fn list_exercise_templates(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<Vec<ExerciseTemplate>>, ApiError> {
    Ok(Json(exercises::list(&*state.storage, &session).await?))
}

/// GET /api/exercise-templates/:id
pub async fn get_exercise_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseTemplate>, ApiError> {
    Ok(Json(exercises::get(&*state.storage, &session, id).await?))
}

/// POST /api/exercise-templates
pub async fn create_exercise_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    ValidatedJson(request): ValidatedJson<CreateExerciseTemplateRequest>,
) -> Result<(StatusCode, Json<ExerciseTemplate>), ApiError> {
    let template = exercises::create(&*state.storage, &session, request).await?;
    info!(exercise_template_id = template.id, name = %template.name, "Exercise template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// Global templates answer 403.
///
/// PATCH /api/exercise-templates/:id
pub async fn update_exercise_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateExerciseTemplateRequest>,
) -> Result<Json<ExerciseTemplate>, ApiError> {
    let template = exercises::update(&*state.storage, &session, id, request).await?;
    info!(exercise_template_id = id, "Exercise template updated");
    Ok(Json(template))
}

/// DELETE /api/exercise-templates/:id
pub async fn delete_exercise_template(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    exercises::delete(&*state.storage, &session, id).await?;
    info!(exercise_template_id = id, "Exercise template deleted");
    Ok(StatusCode::NO_CONTENT)
}
