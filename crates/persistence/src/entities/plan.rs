//! Freeform plan and client plan entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{ClientPlan, Plan, PlanType};

/// Database row mapping for the plans table.
#[derive(Debug, Clone, FromRow)]
pub struct PlanEntity {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub plan_type: String,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<PlanEntity> for Plan {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            name: entity.name,
            description: entity.description,
            plan_type: PlanType::from_str(&entity.plan_type).unwrap_or(PlanType::Combined),
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the client_plans table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientPlanEntity {
    pub id: i64,
    pub client_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl From<ClientPlanEntity> for ClientPlan {
    fn from(entity: ClientPlanEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            plan_id: entity.plan_id,
            start_date: entity.start_date,
            end_date: entity.end_date,
            is_active: entity.is_active,
            notes: entity.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_type_parsed() {
        let entity = PlanEntity {
            id: 1,
            trainer_id: 1,
            name: "Cut".to_string(),
            description: None,
            plan_type: "nutrition".to_string(),
            content: serde_json::json!({"meals": 4}),
            created_at: Utc::now(),
        };
        let plan: Plan = entity.into();
        assert_eq!(plan.plan_type, PlanType::Nutrition);
        assert_eq!(plan.content["meals"], 4);
    }
}
