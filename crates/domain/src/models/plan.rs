//! Freeform plans and their assignment to clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of freeform plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Fitness,
    Nutrition,
    Combined,
}

impl PlanType {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Fitness => "fitness",
            PlanType::Nutrition => "nutrition",
            PlanType::Combined => "combined",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fitness" => Some(PlanType::Fitness),
            "nutrition" => Some(PlanType::Nutrition),
            "combined" => Some(PlanType::Combined),
            _ => None,
        }
    }
}

/// A trainer-authored plan whose body is free-form JSON content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a plan.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub plan_type: PlanType,

    pub content: serde_json::Value,
}

/// Request payload for updating a plan (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub plan_type: Option<PlanType>,

    pub content: Option<serde_json::Value>,
}

impl Plan {
    pub fn apply(&mut self, patch: &UpdatePlanRequest) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if patch.description.is_some() {
            self.description = patch.description.clone();
        }
        if let Some(plan_type) = patch.plan_type {
            self.plan_type = plan_type;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }
}

/// A plan assigned to a client for a period of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPlan {
    pub id: i64,
    pub client_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Request payload for assigning a plan to a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientPlanRequest {
    pub client_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Request payload for updating a client plan (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientPlanRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl ClientPlan {
    pub fn apply(&mut self, patch: &UpdateClientPlanRequest) {
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
    }
}

/// Query parameters for listing client plans.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientPlanQuery {
    pub client_id: i64,
}
