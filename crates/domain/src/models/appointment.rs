//! Appointment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl AppointmentStatus {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Rescheduled => "Rescheduled",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(AppointmentStatus::Scheduled),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            "Rescheduled" => Some(AppointmentStatus::Rescheduled),
            _ => None,
        }
    }
}

/// A scheduled session between a trainer and a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub trainer_id: i64,
    pub client_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub appointment_type: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Trainer's list entry, carrying the client's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithClient {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub client_id: i64,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Appointment type must be at most 50 characters"))]
    pub appointment_type: Option<String>,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    #[serde(default)]
    pub status: AppointmentStatus,
}

/// Ensures an appointment ends after it starts.
pub fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), DomainError> {
    if end > start {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "end_time",
            "End time must be after start time",
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Appointment type must be at most 50 characters"))]
    pub appointment_type: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub trainer_id: i64,
    pub client_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub appointment_type: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn apply(&mut self, patch: &UpdateAppointmentRequest) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if patch.description.is_some() {
            self.description = patch.description.clone();
        }
        if patch.appointment_type.is_some() {
            self.appointment_type = patch.appointment_type.clone();
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Rescheduled).unwrap(),
            "\"Rescheduled\""
        );
        assert_eq!(
            AppointmentStatus::from_str("Cancelled"),
            Some(AppointmentStatus::Cancelled)
        );
    }

    #[test]
    fn test_end_must_follow_start() {
        let req: CreateAppointmentRequest = serde_json::from_value(json!({
            "client_id": 1,
            "title": "PT session",
            "start_time": "2024-03-04T10:00:00Z",
            "end_time": "2024-03-04T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.status, AppointmentStatus::Scheduled);
        assert!(req.validate().is_ok());
        assert!(check_window(req.start_time, req.end_time).is_err());
    }

    #[test]
    fn test_valid_window() {
        let req: CreateAppointmentRequest = serde_json::from_value(json!({
            "client_id": 1,
            "title": "PT session",
            "start_time": "2024-03-04T10:00:00Z",
            "end_time": "2024-03-04T11:00:00Z"
        }))
        .unwrap();
        assert!(check_window(req.start_time, req.end_time).is_ok());
    }
}
