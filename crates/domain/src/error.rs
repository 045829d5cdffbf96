//! Domain error types.

use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist.
    #[error("Referenced record not found: {0}")]
    ForeignKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    /// A parent row was written but its children were not. The parent has
    /// been deleted again on a best-effort basis.
    #[error("Failed to create {entity}: {reason}")]
    PartialWrite { entity: &'static str, reason: String },

    #[error(transparent)]
    Storage(StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Shorthand for a validation error on one field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation(vec![FieldError::new(field, message)])
    }

    /// Attaches a single validator error to `field`.
    pub fn at_field(field: impl Into<String>, err: ValidationError) -> Self {
        let field = field.into();
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} is invalid", field));
        Self::invalid(field, message)
    }

    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => DomainError::Conflict(msg),
            StorageError::ForeignKey(_) => DomainError::NotFound("Referenced record"),
            other => DomainError::Storage(other),
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        // HashMap iteration order is not stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        DomainError::Validation(fields)
    }
}
