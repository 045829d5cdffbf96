//! Client activity log: self-reported status for one calendar occurrence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Source stream of a calendar occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Appointment,
    Fitness,
    Nutrition,
}

impl ItemType {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Appointment => "appointment",
            ItemType::Fitness => "fitness",
            ItemType::Nutrition => "nutrition",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "appointment" => Some(ItemType::Appointment),
            "fitness" => Some(ItemType::Fitness),
            "nutrition" => Some(ItemType::Nutrition),
            _ => None,
        }
    }

    /// Table the occurrence's source row lives in.
    pub fn source_table(&self) -> &'static str {
        match self {
            ItemType::Appointment => "appointments",
            ItemType::Fitness => "fitness_plan_items",
            ItemType::Nutrition => "nutrition_plan_items",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Pending,
    Completed,
    PartiallyCompleted,
    Skipped,
    Rescheduled,
}

impl ActivityStatus {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::Completed => "completed",
            ActivityStatus::PartiallyCompleted => "partially_completed",
            ActivityStatus::Skipped => "skipped",
            ActivityStatus::Rescheduled => "rescheduled",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ActivityStatus::Pending),
            "completed" => Some(ActivityStatus::Completed),
            "partially_completed" => Some(ActivityStatus::PartiallyCompleted),
            "skipped" => Some(ActivityStatus::Skipped),
            "rescheduled" => Some(ActivityStatus::Rescheduled),
            _ => None,
        }
    }
}

/// One log row. Unique per `(client_id, original_item_id, item_type)`.
///
/// `original_item_id` is a calendar occurrence id and is not checked
/// against any source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub client_id: i64,
    pub original_item_id: String,
    pub item_type: ItemType,
    pub title: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: ActivityStatus,
    pub client_notes: Option<String>,
    pub completion_details: serde_json::Value,
    pub performed_at: DateTime<Utc>,
    pub source_item_table: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for recording a client's status on an occurrence.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertActivityLogRequest {
    #[validate(length(min = 1, max = 200, message = "original_item_id must be 1-200 characters"))]
    pub original_item_id: String,

    pub item_type: ItemType,

    #[validate(length(max = 300, message = "Title must be at most 300 characters"))]
    pub title: Option<String>,

    pub scheduled_date: NaiveDate,

    pub status: ActivityStatus,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub client_notes: Option<String>,

    /// JSON object, or a string holding one. Absent means `{}`.
    pub completion_details: Option<serde_json::Value>,

    /// Defaults to now on insert.
    pub performed_at: Option<DateTime<Utc>>,

    #[validate(length(max = 100, message = "source_item_table must be at most 100 characters"))]
    pub source_item_table: Option<String>,
}

/// A normalized log row ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub client_id: i64,
    pub original_item_id: String,
    pub item_type: ItemType,
    pub title: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: ActivityStatus,
    pub client_notes: Option<String>,
    pub completion_details: serde_json::Value,
    pub performed_at: DateTime<Utc>,
    pub source_item_table: Option<String>,
}

/// Fields an existing log row may change. Identity fields are fixed.
#[derive(Debug, Clone)]
pub struct ActivityLogUpdate {
    pub status: ActivityStatus,
    pub client_notes: Option<String>,
    pub completion_details: serde_json::Value,
}

impl ActivityLogEntry {
    pub fn apply(&mut self, update: &ActivityLogUpdate) {
        self.status = update.status;
        self.client_notes = update.client_notes.clone();
        self.completion_details = update.completion_details.clone();
        self.updated_at = Utc::now();
    }
}

/// Lookup of one entry by occurrence.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityLogLookup {
    pub original_item_id: String,
    pub item_type: ItemType,
}

/// Optional scheduled-date window for listing logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityLogRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_type_source_table() {
        assert_eq!(ItemType::Appointment.source_table(), "appointments");
        assert_eq!(ItemType::Fitness.source_table(), "fitness_plan_items");
        assert_eq!(ItemType::Nutrition.source_table(), "nutrition_plan_items");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(
            ActivityStatus::from_str("partially_completed"),
            Some(ActivityStatus::PartiallyCompleted)
        );
        assert_eq!(
            serde_json::to_value(ActivityStatus::PartiallyCompleted).unwrap(),
            json!("partially_completed")
        );
        assert_eq!(ActivityStatus::from_str("done"), None);
    }

    #[test]
    fn test_upsert_request_parses() {
        let req: UpsertActivityLogRequest = serde_json::from_value(json!({
            "original_item_id": "fit-item-3-20240304",
            "item_type": "fitness",
            "scheduled_date": "2024-03-04",
            "status": "completed",
            "completion_details": {"reps": [10, 10, 8]}
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.item_type, ItemType::Fitness);
        assert!(req.performed_at.is_none());
    }

    #[test]
    fn test_empty_occurrence_id_rejected() {
        let req: UpsertActivityLogRequest = serde_json::from_value(json!({
            "original_item_id": "",
            "item_type": "appointment",
            "scheduled_date": "2024-03-04",
            "status": "skipped"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
