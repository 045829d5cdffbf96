//! Unified calendar feed types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::activity_log::ItemType;
use super::appointment::AppointmentStatus;
use crate::error::DomainError;

/// Query parameters for a calendar request.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// An inclusive, validated range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validates `start <= end` and that the range spans at most `max_days` days.
    pub fn new(start: NaiveDate, end: NaiveDate, max_days: u32) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::invalid("end", "End date must not be before start date"));
        }
        let days = (end - start).num_days() + 1;
        if days > i64::from(max_days) {
            return Err(DomainError::invalid(
                "end",
                format!("Date range must not exceed {} days", max_days),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Half-open UTC instant bounds `[start 00:00, end + 1 day 00:00)`.
    pub fn instant_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let lower = self.start.and_time(chrono::NaiveTime::MIN).and_utc();
        let upper = self
            .end
            .succ_opt()
            .unwrap_or(self.end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        (lower, upper)
    }
}

/// Type-specific fields carried alongside an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    /// Id of the row the occurrence was produced from.
    pub source_id: i64,
}

/// One occurrence in the unified calendar. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Stable per occurrence. Activity logs reference this value.
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    #[serde(rename = "item_type")]
    pub item_type: ItemType,
    #[serde(rename = "scheduled_date")]
    pub scheduled_date: NaiveDate,
    pub extended_props: EventProps,
}
