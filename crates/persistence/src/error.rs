//! Mapping of sqlx errors onto storage errors.

use domain::error::StorageError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Friendly message for a violated unique constraint.
fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_username_key") => "Username already taken".to_string(),
        Some("users_email_key") => "Email already registered".to_string(),
        Some("client_activity_logs_occurrence_key") => {
            "Activity already logged".to_string()
        }
        Some(name) => format!("Duplicate value violates {}", name),
        None => "Duplicate value".to_string(),
    }
}

/// Converts a sqlx error into a [`StorageError`].
pub fn db_err(err: sqlx::Error) -> StorageError {
    if let Some(db) = err.as_database_error() {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StorageError::Conflict(conflict_message(db.constraint())),
            Some(FOREIGN_KEY_VIOLATION) => {
                return StorageError::ForeignKey(db.constraint().unwrap_or("unknown").to_string())
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    StorageError::Backend(err.to_string())
}
