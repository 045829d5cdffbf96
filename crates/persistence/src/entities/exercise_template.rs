//! Exercise template entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::ExerciseTemplate;

/// Database row mapping for the exercise_templates table.
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseTemplateEntity {
    pub id: i64,
    pub trainer_id: Option<i64>,
    pub name: String,
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub default_params: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ExerciseTemplateEntity> for ExerciseTemplate {
    fn from(entity: ExerciseTemplateEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            name: entity.name,
            exercise_type: entity.exercise_type,
            muscle_group: entity.muscle_group,
            equipment: entity.equipment,
            default_params: entity.default_params,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
