//! Assigned nutrition plan entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{DayOfWeek, NutritionPlan, NutritionPlanItem};

/// Database row mapping for the nutrition_plans table.
#[derive(Debug, Clone, FromRow)]
pub struct NutritionPlanEntity {
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

impl From<NutritionPlanEntity> for NutritionPlan {
    fn from(entity: NutritionPlanEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            trainer_id: entity.trainer_id,
            name: entity.name,
            description: entity.description,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the nutrition_plan_items table.
#[derive(Debug, Clone, FromRow)]
pub struct NutritionPlanItemEntity {
    pub id: i64,
    pub nutrition_plan_id: i64,
    pub day_of_week: Option<String>,
    pub meal_type: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub item_order: i32,
}

impl From<NutritionPlanItemEntity> for NutritionPlanItem {
    fn from(entity: NutritionPlanItemEntity) -> Self {
        Self {
            id: entity.id,
            nutrition_plan_id: entity.nutrition_plan_id,
            day_of_week: entity.day_of_week.as_deref().and_then(DayOfWeek::from_str),
            meal_type: entity.meal_type,
            description: entity.description,
            calories: entity.calories,
            protein_g: entity.protein_g,
            carbs_g: entity.carbs_g,
            fat_g: entity.fat_g,
            item_order: entity.item_order,
        }
    }
}
