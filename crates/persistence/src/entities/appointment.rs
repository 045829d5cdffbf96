//! Appointment entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::appointment::AppointmentWithClient;
use domain::models::{Appointment, AppointmentStatus};

/// Database row mapping for the appointments table.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentEntity {
    pub id: i64,
    pub trainer_id: i64,
    pub client_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub appointment_type: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<AppointmentEntity> for Appointment {
    fn from(entity: AppointmentEntity) -> Self {
        Self {
            id: entity.id,
            trainer_id: entity.trainer_id,
            client_id: entity.client_id,
            title: entity.title,
            description: entity.description,
            appointment_type: entity.appointment_type,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status: AppointmentStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
        }
    }
}

/// Appointment row joined with the client's name.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentWithClientEntity {
    #[sqlx(flatten)]
    pub appointment: AppointmentEntity,
    pub client_name: String,
}

impl From<AppointmentWithClientEntity> for AppointmentWithClient {
    fn from(entity: AppointmentWithClientEntity) -> Self {
        Self {
            appointment: entity.appointment.into(),
            client_name: entity.client_name,
        }
    }
}
