//! Assigned fitness plan entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{DayOfWeek, FitnessPlan, FitnessPlanItem};

/// Database row mapping for the fitness_plans table.
#[derive(Debug, Clone, FromRow)]
pub struct FitnessPlanEntity {
    pub id: i64,
    pub client_id: i64,
    pub trainer_id: i64,
    pub source_plan_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FitnessPlanEntity> for FitnessPlan {
    fn from(entity: FitnessPlanEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            trainer_id: entity.trainer_id,
            source_plan_template_id: entity.source_plan_template_id,
            name: entity.name,
            description: entity.description,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the fitness_plan_items table.
#[derive(Debug, Clone, FromRow)]
pub struct FitnessPlanItemEntity {
    pub id: i64,
    pub fitness_plan_id: i64,
    pub exercise_template_id: Option<i64>,
    pub exercise_name: String,
    pub day_of_week: Option<String>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

impl From<FitnessPlanItemEntity> for FitnessPlanItem {
    fn from(entity: FitnessPlanItemEntity) -> Self {
        Self {
            id: entity.id,
            fitness_plan_id: entity.fitness_plan_id,
            exercise_template_id: entity.exercise_template_id,
            exercise_name: entity.exercise_name,
            day_of_week: entity.day_of_week.as_deref().and_then(DayOfWeek::from_str),
            exercise_order: entity.exercise_order,
            custom_params: entity.custom_params,
            notes: entity.notes,
        }
    }
}
