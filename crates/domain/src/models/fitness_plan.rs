//! Fitness plans assigned to clients.
//!
//! An assigned plan holds a denormalized copy of its items so that later
//! edits to the source template or exercise library do not rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::day::DayOfWeek;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessPlan {
    pub id: i64,
    pub client_id: i64,
    pub trainer_id: i64,
    pub source_plan_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Open-ended when absent.
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessPlanItem {
    pub id: i64,
    pub fitness_plan_id: i64,
    pub exercise_template_id: Option<i64>,
    pub exercise_name: String,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FitnessPlanItemInput {
    pub exercise_template_id: Option<i64>,
    pub exercise_name: Option<String>,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: Option<i32>,
    pub custom_params: Option<serde_json::Value>,
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Request payload for assigning a fitness plan to a client.
///
/// When `items` is absent and `source_plan_template_id` is set, the
/// template's items are copied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignFitnessPlanRequest {
    pub client_id: i64,

    pub source_plan_template_id: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Plan name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub items: Option<Vec<FitnessPlanItemInput>>,
}

#[derive(Debug, Clone)]
pub struct NewFitnessPlan {
    pub client_id: i64,
    pub trainer_id: i64,
    pub source_plan_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFitnessPlanItem {
    pub exercise_template_id: Option<i64>,
    pub exercise_name: String,
    pub day_of_week: Option<DayOfWeek>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessPlanDetails {
    #[serde(flatten)]
    pub plan: FitnessPlan,
    pub items: Vec<FitnessPlanItem>,
}

impl FitnessPlan {
    /// Whether the plan window overlaps `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date.map_or(true, |e| e >= start)
    }
}
