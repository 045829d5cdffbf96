//! Client activity log entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use domain::models::{ActivityLogEntry, ActivityStatus, ItemType};

/// Database row mapping for the client_activity_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: i64,
    pub client_id: i64,
    pub original_item_id: String,
    pub item_type: String,
    pub title: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub client_notes: Option<String>,
    pub completion_details: serde_json::Value,
    pub performed_at: DateTime<Utc>,
    pub source_item_table: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityLogEntity> for ActivityLogEntry {
    fn from(entity: ActivityLogEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            original_item_id: entity.original_item_id,
            // Constrained by a CHECK on the column
            item_type: ItemType::from_str(&entity.item_type).unwrap_or(ItemType::Appointment),
            title: entity.title,
            scheduled_date: entity.scheduled_date,
            status: ActivityStatus::from_str(&entity.status).unwrap_or_default(),
            client_notes: entity.client_notes,
            completion_details: entity.completion_details,
            performed_at: entity.performed_at,
            source_item_table: entity.source_item_table,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
