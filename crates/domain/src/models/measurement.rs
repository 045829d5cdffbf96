//! Body measurements and client goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A dated set of body metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
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

/// Metrics that can be charted as a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMetric {
    WeightKg,
    BodyFatPercentage,
    WaistCm,
    ChestCm,
    HipsCm,
}

impl MeasurementMetric {
    pub fn value_of(&self, m: &Measurement) -> Option<f64> {
        match self {
            MeasurementMetric::WeightKg => m.weight_kg,
            MeasurementMetric::BodyFatPercentage => m.body_fat_percentage,
            MeasurementMetric::WaistCm => m.waist_cm,
            MeasurementMetric::ChestCm => m.chest_cm,
            MeasurementMetric::HipsCm => m.hips_cm,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMeasurementRequest {
    pub measurement_date: NaiveDate,

    #[validate(range(min = 0.0, max = 1000.0, message = "Weight must be between 0 and 1000 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0, message = "Body fat must be between 0 and 100%"))]
    pub body_fat_percentage: Option<f64>,

    #[validate(range(min = 0.0, max = 500.0, message = "Waist must be between 0 and 500 cm"))]
    pub waist_cm: Option<f64>,

    #[validate(range(min = 0.0, max = 500.0, message = "Chest must be between 0 and 500 cm"))]
    pub chest_cm: Option<f64>,

    #[validate(range(min = 0.0, max = 500.0, message = "Hips must be between 0 and 500 cm"))]
    pub hips_cm: Option<f64>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub client_id: i64,
    pub measurement_date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub waist_cm: Option<f64>,
    pub chest_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub notes: Option<String>,
}

impl NewMeasurement {
    pub fn from_request(client_id: i64, req: CreateMeasurementRequest) -> Self {
        Self {
            client_id,
            measurement_date: req.measurement_date,
            weight_kg: req.weight_kg,
            body_fat_percentage: req.body_fat_percentage,
            waist_cm: req.waist_cm,
            chest_cm: req.chest_cm,
            hips_cm: req.hips_cm,
            notes: req.notes,
        }
    }
}

/// Query parameters for a measurement series.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesQuery {
    pub metric: MeasurementMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Achieved,
    Abandoned,
}

impl GoalStatus {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Achieved => "achieved",
            GoalStatus::Abandoned => "abandoned",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GoalStatus::Active),
            "achieved" => Some(GoalStatus::Achieved),
            "abandoned" => Some(GoalStatus::Abandoned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub client_id: i64,
    pub goal_description: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Goal with its computed completion percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub goal_description: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    #[validate(length(max = 30, message = "Unit must be at most 30 characters"))]
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub goal_description: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    #[validate(length(max = 30, message = "Unit must be at most 30 characters"))]
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: Option<GoalStatus>,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub client_id: i64,
    pub goal_description: String,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
}

impl NewGoal {
    pub fn from_request(client_id: i64, req: CreateGoalRequest) -> Self {
        Self {
            client_id,
            goal_description: req.goal_description,
            target_value: req.target_value,
            current_value: req.current_value,
            unit: req.unit,
            target_date: req.target_date,
            status: req.status,
        }
    }
}

impl Goal {
    pub fn apply(&mut self, patch: &UpdateGoalRequest) {
        if let Some(desc) = &patch.goal_description {
            self.goal_description = desc.clone();
        }
        if patch.target_value.is_some() {
            self.target_value = patch.target_value;
        }
        if patch.current_value.is_some() {
            self.current_value = patch.current_value;
        }
        if patch.unit.is_some() {
            self.unit = patch.unit.clone();
        }
        if patch.target_date.is_some() {
            self.target_date = patch.target_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_value_of() {
        let m = Measurement {
            id: 1,
            client_id: 1,
            measurement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weight_kg: Some(80.5),
            body_fat_percentage: None,
            waist_cm: Some(90.0),
            chest_cm: None,
            hips_cm: None,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(MeasurementMetric::WeightKg.value_of(&m), Some(80.5));
        assert_eq!(MeasurementMetric::BodyFatPercentage.value_of(&m), None);
    }

    #[test]
    fn test_metric_parsing() {
        let q: SeriesQuery = serde_json::from_str(r#"{"metric":"body_fat_percentage"}"#).unwrap();
        assert_eq!(q.metric, MeasurementMetric::BodyFatPercentage);
    }

    #[test]
    fn test_body_fat_range() {
        let req = CreateMeasurementRequest {
            measurement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weight_kg: None,
            body_fat_percentage: Some(120.0),
            waist_cm: None,
            chest_cm: None,
            hips_cm: None,
            notes: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_goal_status_strings() {
        assert_eq!(GoalStatus::from_str("achieved"), Some(GoalStatus::Achieved));
        assert_eq!(GoalStatus::default().as_str(), "active");
    }
}
