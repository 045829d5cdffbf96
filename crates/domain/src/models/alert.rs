//! Trainer alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A trainer-authored notification, optionally about one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub trainer_id: i64,
    pub client_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAlertRequest {
    pub client_id: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub trainer_id: i64,
    pub client_id: Option<i64>,
    pub title: String,
    pub message: String,
}

/// Query parameters for listing alerts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_query_default() {
        let q: AlertQuery = serde_json::from_str("{}").unwrap();
        assert!(!q.unread_only);
    }

    #[test]
    fn test_empty_title_rejected() {
        let req = CreateAlertRequest {
            client_id: None,
            title: String::new(),
            message: "Check in".into(),
        };
        assert!(req.validate().is_err());
    }
}
