//! Payment and progress-tracking records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A charge against a client. Amounts are stored in minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub client_id: i64,
    pub amount: i64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub client_id: i64,

    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub amount: i64,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,

    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub amount: Option<i64>,

    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: Option<String>,

    pub date: Option<DateTime<Utc>>,

    pub is_paid: Option<bool>,
}

/// A validated payment ready to be stored.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub client_id: i64,
    pub amount: i64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_paid: bool,
}

impl From<CreatePaymentRequest> for NewPayment {
    fn from(req: CreatePaymentRequest) -> Self {
        Self {
            client_id: req.client_id,
            amount: req.amount,
            description: req.description,
            date: req.date.unwrap_or_else(Utc::now),
            is_paid: req.is_paid,
        }
    }
}

impl Payment {
    pub fn apply(&mut self, patch: &UpdatePaymentRequest) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(paid) = patch.is_paid {
            self.is_paid = paid;
        }
    }
}

/// Optional client filter for payment and progress listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub client_id: Option<i64>,
}

/// Progress is always listed for one client.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressQuery {
    pub client_id: i64,
}

/// A free-form progress snapshot for a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: i64,
    pub client_id: i64,
    pub date: DateTime<Utc>,
    pub metrics: serde_json::Value,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProgressRequest {
    pub client_id: i64,
    pub date: Option<DateTime<Utc>>,
    /// Must be a JSON object. A string holding a JSON object is accepted.
    pub metrics: serde_json::Value,
    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    pub date: Option<DateTime<Utc>>,
    pub metrics: Option<serde_json::Value>,
    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProgressEntry {
    pub client_id: i64,
    pub date: DateTime<Utc>,
    pub metrics: serde_json::Value,
    pub notes: Option<String>,
}

impl ProgressEntry {
    /// Applies a partial update. `metrics` must already be normalized.
    pub fn apply(&mut self, patch: &UpdateProgressRequest) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(metrics) = &patch.metrics {
            self.metrics = metrics.clone();
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
    }
}
