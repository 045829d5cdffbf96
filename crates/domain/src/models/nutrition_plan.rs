//! Nutrition plans assigned to clients, with per-day meal items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::day::DayOfWeek;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub id: i64,
    pub client_id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlanItem {
    pub id: i64,
    pub nutrition_plan_id: i64,
    pub day_of_week: Option<DayOfWeek>,
    pub meal_type: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub item_order: i32,
}

/// A meal item as submitted. Checked by the assignment service since the
/// derive cannot reach into the item list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NutritionPlanItemInput {
    pub day_of_week: Option<DayOfWeek>,
    pub meal_type: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub item_order: Option<i32>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNutritionPlanRequest {
    pub client_id: i64,

    #[validate(length(min = 1, max = 200, message = "Plan name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub items: Vec<NutritionPlanItemInput>,
}

#[derive(Debug, Clone)]
pub struct NewNutritionPlan {
    pub client_id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNutritionPlanItem {
    pub day_of_week: Option<DayOfWeek>,
    pub meal_type: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub item_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlanDetails {
    #[serde(flatten)]
    pub plan: NutritionPlan,
    pub items: Vec<NutritionPlanItem>,
}

impl NutritionPlan {
    /// Whether the plan window overlaps `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date.map_or(true, |e| e >= start)
    }
}
