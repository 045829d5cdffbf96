//! Alert and branding entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Alert, Branding, MessageTone};

/// Database row mapping for the alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: i64,
    pub trainer_id: i64,
    pub client_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AlertEntity> for Alert {
    fn from(entity: AlertEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            client_id: entity.client_id,
            title: entity.title,
            message: entity.message,
            is_read: entity.is_read,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the branding table.
#[derive(Debug, Clone, FromRow)]
pub struct BrandingEntity {
    pub id: i64,
    pub trainer_id: i64,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub message_tone: String,
    pub terms_of_service: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<BrandingEntity> for Branding {
    fn from(entity: BrandingEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            logo_url: entity.logo_url,
            primary_color: entity.primary_color,
            secondary_color: entity.secondary_color,
            message_tone: MessageTone::from_str(&entity.message_tone).unwrap_or_default(),
            terms_of_service: entity.terms_of_service,
            updated_at: entity.updated_at,
        }
    }
}
