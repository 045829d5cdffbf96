//! Exercise templates: the exercise library plan items refer to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An exercise definition. `trainer_id = None` marks a global template
/// visible to every trainer and editable by none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub id: i64,
    pub trainer_id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub default_params: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExerciseTemplate {
    pub fn is_global(&self) -> bool {
        self.trainer_id.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExerciseTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(max = 50, message = "Type must be at most 50 characters"))]
    pub exercise_type: Option<String>,

    #[validate(length(max = 100, message = "Muscle group must be at most 100 characters"))]
    pub muscle_group: Option<String>,

    #[validate(length(max = 100, message = "Equipment must be at most 100 characters"))]
    pub equipment: Option<String>,

    /// JSON object, or a string holding one. Blank means none.
    pub default_params: Option<serde_json::Value>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateExerciseTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(max = 50, message = "Type must be at most 50 characters"))]
    pub exercise_type: Option<String>,

    #[validate(length(max = 100, message = "Muscle group must be at most 100 characters"))]
    pub muscle_group: Option<String>,

    #[validate(length(max = 100, message = "Equipment must be at most 100 characters"))]
    pub equipment: Option<String>,

    pub default_params: Option<serde_json::Value>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExerciseTemplate {
    pub trainer_id: i64,
    pub name: String,
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub default_params: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Normalized partial update. `default_params: Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ExerciseTemplatePatch {
    pub name: Option<String>,
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub default_params: Option<Option<serde_json::Value>>,
    pub notes: Option<String>,
}

impl ExerciseTemplate {
    pub fn apply(&mut self, patch: &ExerciseTemplatePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if patch.exercise_type.is_some() {
            self.exercise_type = patch.exercise_type.clone();
        }
        if patch.muscle_group.is_some() {
            self.muscle_group = patch.muscle_group.clone();
        }
        if patch.equipment.is_some() {
            self.equipment = patch.equipment.clone();
        }
        if let Some(params) = &patch.default_params {
            self.default_params = params.clone();
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(params: Option<serde_json::Value>) -> ExerciseTemplate {
        ExerciseTemplate {
            id: 1,
            trainer_id: Some(1),
            name: "Squat".into(),
            exercise_type: Some("strength".into()),
            muscle_group: Some("legs".into()),
            equipment: Some("barbell".into()),
            default_params: params,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_type_field_renamed() {
        let json = serde_json::to_value(template(None)).unwrap();
        assert_eq!(json["type"], "strength");
        assert!(json.get("exercise_type").is_none());
    }

    #[test]
    fn test_patch_can_clear_default_params() {
        let mut t = template(Some(json!({"sets": 3})));
        t.apply(&ExerciseTemplatePatch {
            default_params: Some(None),
            ..Default::default()
        });
        assert!(t.default_params.is_none());
    }

    #[test]
    fn test_patch_leaves_absent_fields() {
        let mut t = template(Some(json!({"sets": 3})));
        t.apply(&ExerciseTemplatePatch {
            name: Some("Front Squat".into()),
            ..Default::default()
        });
        assert_eq!(t.name, "Front Squat");
        assert_eq!(t.default_params, Some(json!({"sets": 3})));
    }
}
