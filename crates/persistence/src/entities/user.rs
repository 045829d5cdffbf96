//! Trainer account entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::User;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            name: entity.name,
            email: entity.email,
            avatar_url: entity.avatar_url,
            created_at: entity.created_at,
        }
    }
}
