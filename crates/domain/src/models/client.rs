//! Client domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A client on a trainer's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goals: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Request payload for creating a client.
///
/// The owning trainer is taken from the session. Name and email are
/// optional at the serde level so that a missing field is reported as a
/// field error rather than a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(required(message = "Name is required"))]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(required(message = "Email is required"))]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub phone: Option<String>,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(range(min = 50.0, max = 272.0, message = "Height must be between 50 and 272 cm"))]
    pub height_cm: Option<f64>,

    #[validate(range(min = 20.0, max = 400.0, message = "Weight must be between 20 and 400 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(length(max = 2000, message = "Goals must be at most 2000 characters"))]
    pub goals: Option<String>,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub notes: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request payload for updating a client (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub phone: Option<String>,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(range(min = 50.0, max = 272.0, message = "Height must be between 50 and 272 cm"))]
    pub height_cm: Option<f64>,

    #[validate(range(min = 20.0, max = 400.0, message = "Weight must be between 20 and 400 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(length(max = 2000, message = "Goals must be at most 2000 characters"))]
    pub goals: Option<String>,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub notes: Option<String>,

    pub is_active: Option<bool>,
}

/// A validated client ready to be stored.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub trainer_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goals: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl NewClient {
    /// Builds the stored form of a request that has already passed validation.
    pub fn from_request(trainer_id: i64, req: CreateClientRequest) -> Self {
        Self {
            trainer_id,
            name: req.name.unwrap_or_default().trim().to_string(),
            email: req.email.unwrap_or_default(),
            phone: req.phone,
            avatar_url: req.avatar_url,
            date_of_birth: req.date_of_birth,
            height_cm: req.height_cm,
            weight_kg: req.weight_kg,
            goals: req.goals,
            notes: req.notes,
            is_active: req.is_active,
        }
    }
}

impl Client {
    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: &UpdateClientRequest) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if patch.phone.is_some() {
            self.phone = patch.phone.clone();
        }
        if patch.avatar_url.is_some() {
            self.avatar_url = patch.avatar_url.clone();
        }
        if patch.date_of_birth.is_some() {
            self.date_of_birth = patch.date_of_birth;
        }
        if patch.height_cm.is_some() {
            self.height_cm = patch.height_cm;
        }
        if patch.weight_kg.is_some() {
            self.weight_kg = patch.weight_kg;
        }
        if patch.goals.is_some() {
            self.goals = patch.goals.clone();
        }
        if patch.notes.is_some() {
            self.notes = patch.notes.clone();
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }
}

/// Response payload for listing clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListClientsResponse {
    pub data: Vec<Client>,
    pub total: usize,
}
