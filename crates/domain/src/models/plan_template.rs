//! Reusable workout plan templates and their items.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::day::{DayKey, DayOfWeek};
use super::exercise::ExerciseTemplate;

/// A trainer's reusable plan structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub days_per_week: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One exercise slot of a plan template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTemplateItem {
    pub id: i64,
    pub plan_template_id: i64,
    pub exercise_template_id: Option<i64>,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

/// Item as submitted by the plan builder. The order is advisory: it is
/// recomputed from the item's position within its day on save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanTemplateItemInput {
    pub exercise_template_id: Option<i64>,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: Option<i32>,
    /// JSON object, or a string holding one.
    pub custom_params: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Item ready to be stored under a template.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanTemplateItem {
    pub exercise_template_id: Option<i64>,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

impl From<PlanTemplateItem> for PlanTemplateItemInput {
    fn from(item: PlanTemplateItem) -> Self {
        Self {
            exercise_template_id: item.exercise_template_id,
            day_of_week: item.day_of_week,
            exercise_order: Some(item.exercise_order),
            custom_params: Some(item.custom_params),
            notes: item.notes,
        }
    }
}

/// Request body for creating or replacing a template.
///
/// Items may be sent flat (`items`) or grouped by day as the builder holds
/// them (`days`). When both are present `days` wins.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SavePlanTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 104, message = "Duration must be between 1 and 104 weeks"))]
    pub duration_weeks: Option<i32>,

    #[validate(range(min = 1, max = 7, message = "Days per week must be between 1 and 7"))]
    pub days_per_week: Option<i32>,

    #[serde(default)]
    pub items: Vec<PlanTemplateItemInput>,

    pub days: Option<BTreeMap<DayKey, Vec<PlanTemplateItemInput>>>,
}

/// Template header fields as stored.
#[derive(Debug, Clone)]
pub struct NewPlanTemplate {
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub days_per_week: Option<i32>,
}

/// Template item with its exercise resolved from the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplateItemDetails {
    #[serde(flatten)]
    pub item: PlanTemplateItem,
    pub exercise: Option<ExerciseTemplate>,
}

/// A template with its items and exercise details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplateDetails {
    #[serde(flatten)]
    pub template: PlanTemplate,
    pub items: Vec<PlanTemplateItemDetails>,
}

/// Day-grouped editing view of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBuilderView {
    #[serde(flatten)]
    pub template: PlanTemplate,
    pub days: BTreeMap<DayKey, Vec<PlanTemplateItem>>,
}
