//! Exercise library.
//!
//! Trainers see their own templates plus the global ones, and may only
//! modify their own.

use crate::error::DomainError;
use crate::models::exercise::{
    CreateExerciseTemplateRequest, ExerciseTemplate, ExerciseTemplatePatch, NewExerciseTemplate,
    UpdateExerciseTemplateRequest,
};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

fn normalize_params(
    value: Option<serde_json::Value>,
) -> Result<Option<serde_json::Value>, DomainError> {
    shared::validation::normalize_optional_json_object(value)
        .map_err(|e| DomainError::at_field("default_params", e))
}

/// Loads a template the trainer may modify. Global templates are read-only.
async fn own_template(
    storage: &dyn Storage,
    trainer_id: i64,
    id: i64,
) -> Result<ExerciseTemplate, DomainError> {
    let existing = storage.get_exercise_template(id).await?;
    if existing.as_ref().is_some_and(ExerciseTemplate::is_global) {
        return Err(DomainError::Forbidden(
            "Global exercise templates cannot be modified".into(),
        ));
    }
    access::owned(existing, "Exercise template", |t| t.trainer_id == Some(trainer_id))
}

pub async fn list(
    storage: &dyn Storage,
    session: &Session,
) -> Result<Vec<ExerciseTemplate>, DomainError> {
    let trainer_id = session.require_trainer()?;
    Ok(storage.list_exercise_templates(trainer_id).await?)
}

/// Own or global template.
pub async fn get(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
) -> Result<ExerciseTemplate, DomainError> {
    let trainer_id = session.require_trainer()?;
    access::owned(
        storage.get_exercise_template(id).await?,
        "Exercise template",
        |t| t.trainer_id.map_or(true, |owner| owner == trainer_id),
    )
}

pub async fn create(
    storage: &dyn Storage,
    session: &Session,
    req: CreateExerciseTemplateRequest,
) -> Result<ExerciseTemplate, DomainError> {
    let trainer_id = session.require_trainer()?;
    let default_params = normalize_params(req.default_params)?;
    Ok(storage
        .create_exercise_template(NewExerciseTemplate {
            trainer_id,
            name: req.name.trim().to_string(),
            exercise_type: req.exercise_type,
            muscle_group: req.muscle_group,
            equipment: req.equipment,
            default_params,
            notes: req.notes,
        })
        .await?)
}

pub async fn update(
    storage: &dyn Storage,
    session: &Session,
    id: i64,
    req: UpdateExerciseTemplateRequest,
) -> Result<ExerciseTemplate, DomainError> {
    let trainer_id = session.require_trainer()?;
    let default_params = match req.default_params {
        Some(value) => Some(normalize_params(Some(value))?),
        None => None,
    };
    own_template(storage, trainer_id, id).await?;

    let patch = ExerciseTemplatePatch {
        name: req.name.map(|n| n.trim().to_string()),
        exercise_type: req.exercise_type,
        muscle_group: req.muscle_group,
        equipment: req.equipment,
        default_params,
        notes: req.notes,
    };
    storage
        .update_exercise_template(id, &patch)
        .await?
        .ok_or(DomainError::NotFound("Exercise template"))
}

pub async fn delete(storage: &dyn Storage, session: &Session, id: i64) -> Result<(), DomainError> {
    let trainer_id = session.require_trainer()?;
    own_template(storage, trainer_id, id).await?;
    storage.delete_exercise_template(id).await?;
    Ok(())
}
