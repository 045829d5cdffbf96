//! Payment and progress entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Payment, ProgressEntry};

/// Database row mapping for the payments table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: i64,
    pub client_id: i64,
    pub amount: i64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_paid: bool,
}

impl From<PaymentEntity> for Payment {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            amount: entity.amount,
            description: entity.description,
            date: entity.date,
            is_paid: entity.is_paid,
        }
    }
}

/// Database row mapping for the progress_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressEntryEntity {
    pub id: i64,
    pub client_id: i64,
    pub date: DateTime<Utc>,
    pub metrics: serde_json::Value,
    pub notes: Option<String>,
}

impl From<ProgressEntryEntity> for ProgressEntry {
    fn from(entity: ProgressEntryEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            date: entity.date,
            metrics: entity.metrics,
            notes: entity.notes,
        }
    }
}
