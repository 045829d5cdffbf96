//! Day-of-week keys used by plan items.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week a plan item is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }

    /// Position within the week, Monday = 1.
    pub fn number(&self) -> u32 {
        self.to_weekday().number_from_monday()
    }

    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key in the plan builder: a weekday, or the bucket for items
/// that have not been placed on a day yet.
///
/// Serialized as the weekday name or `"Unassigned"` so it can be used as a
/// JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DayKey {
    Day(DayOfWeek),
    Unassigned,
}

impl DayKey {
    pub const UNASSIGNED: &'static str = "Unassigned";

    pub fn day(&self) -> Option<DayOfWeek> {
        match self {
            DayKey::Day(day) => Some(*day),
            DayKey::Unassigned => None,
        }
    }
}

impl From<Option<DayOfWeek>> for DayKey {
    fn from(day: Option<DayOfWeek>) -> Self {
        day.map(DayKey::Day).unwrap_or(DayKey::Unassigned)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        match key {
            DayKey::Day(day) => day.as_str().to_string(),
            DayKey::Unassigned => DayKey::UNASSIGNED.to_string(),
        }
    }
}

impl TryFrom<String> for DayKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == DayKey::UNASSIGNED {
            return Ok(DayKey::Unassigned);
        }
        DayOfWeek::from_str(&value)
            .map(DayKey::Day)
            .ok_or_else(|| format!("unknown day '{}'", value))
    }
}
