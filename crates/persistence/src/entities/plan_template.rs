//! Plan template entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{DayOfWeek, PlanTemplate, PlanTemplateItem};

/// Database row mapping for the plan_templates table.
#[derive(Debug, Clone, FromRow)]
pub struct PlanTemplateEntity {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub days_per_week: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanTemplateEntity> for PlanTemplate {
    fn from(entity: PlanTemplateEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            name: entity.name,
            description: entity.description,
            duration_weeks: entity.duration_weeks,
            days_per_week: entity.days_per_week,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the plan_template_items table.
#[derive(Debug, Clone, FromRow)]
pub struct PlanTemplateItemEntity {
    pub id: i64,
    pub plan_template_id: i64,
    pub exercise_template_id: Option<i64>,
    pub day_of_week: Option<String>,
    pub exercise_order: i32,
    pub custom_params: serde_json::Value,
    pub notes: Option<String>,
}

impl From<PlanTemplateItemEntity> for PlanTemplateItem {
    fn from(entity: PlanTemplateItemEntity) -> Self {
        Self {
            id: entity.id,
            plan_template_id: entity.plan_template_id,
            exercise_template_id: entity.exercise_template_id,
            day_of_week: entity.day_of_week.as_deref().and_then(DayOfWeek::from_str),
            exercise_order: entity.exercise_order,
            custom_params: entity.custom_params,
            notes: entity.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(day: Option<&str>) -> PlanTemplateItemEntity {
        PlanTemplateItemEntity {
            id: 1,
            plan_template_id: 2,
            exercise_template_id: Some(3),
            day_of_week: day.map(str::to_string),
            exercise_order: 1,
            custom_params: serde_json::json!({}),
            notes: None,
        }
    }

    #[test]
    fn test_day_of_week_parsed() {
        let parsed: PlanTemplateItem = item(Some("Wednesday")).into();
        assert_eq!(parsed.day_of_week, Some(DayOfWeek::Wednesday));

        let unassigned: PlanTemplateItem = item(None).into();
        assert_eq!(unassigned.day_of_week, None);
    }
}
