//! Measurement and goal entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{Goal, GoalStatus, Measurement};

/// Database row mapping for the measurements table.
#[derive(Debug, Clone, FromRow)]
pub struct MeasurementEntity {
    pub id: i64,
    pub client_id: i64,
    pub measurement_date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MeasurementEntity> for Measurement {
    fn from(entity: MeasurementEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            measurement_date: entity.measurement_date,
            weight_kg: entity.weight_kg,
            body_fat_percentage: entity.body_fat_percentage,
            waist_cm: entity.waist_cm,
            chest_cm: entity.chest_cm,
            hips_cm: entity.hips_cm,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the goals table.
#[derive(Debug, Clone, FromRow)]
pub struct GoalEntity {
    pub id: i64,
    pub client_id: i64,
    pub goal_description: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GoalEntity> for Goal {
    fn from(entity: GoalEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            goal_description: entity.goal_description,
            target_value: entity.target_value,
            current_value: entity.current_value,
            unit: entity.unit,
            target_date: entity.target_date,
            status: GoalStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
