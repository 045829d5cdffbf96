//! Per-trainer branding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tone used for client-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTone {
    #[default]
    Professional,
    Friendly,
    Motivational,
}

impl MessageTone {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageTone::Professional => "professional",
            MessageTone::Friendly => "friendly",
            MessageTone::Motivational => "motivational",
        }
    }

    /// Parses from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "professional" => Some(MessageTone::Professional),
            "friendly" => Some(MessageTone::Friendly),
            "motivational" => Some(MessageTone::Motivational),
            _ => None,
        }
    }
}

/// Branding record. At most one per trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branding {
    pub id: i64,
    pub trainer_id: i64,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub message_tone: MessageTone,
    pub terms_of_service: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or replacing a trainer's branding.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpsertBrandingRequest {
    #[validate(url(message = "Logo must be a valid URL"))]
    pub logo_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub primary_color: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hex_color"))]
    pub secondary_color: Option<String>,

    #[serde(default)]
    pub message_tone: MessageTone,

    #[validate(length(max = 20000, message = "Terms of service must be at most 20000 characters"))]
    pub terms_of_service: Option<String>,
}
