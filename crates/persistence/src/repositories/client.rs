//! Client repository.

use sqlx::PgPool;

use domain::models::client::{NewClient, UpdateClientRequest};

use crate::entities::ClientEntity;
use crate::metrics::QueryTimer;

/// Repository for client roster operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: &NewClient) -> Result<ClientEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            INSERT INTO clients (trainer_id, name, email, phone, avatar_url, date_of_birth,
                                 height_cm, weight_kg, goals, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(client.trainer_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.avatar_url)
        .bind(client.date_of_birth)
        .bind(client.height_cm)
        .bind(client.weight_kg)
        .bind(&client.goals)
        .bind(&client.notes)
        .bind(client.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_by_id");
        let result = sqlx::query_as::<_, ClientEntity>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All clients of a trainer, ordered by name.
    pub async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_clients_by_trainer");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT * FROM clients
            WHERE trainer_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Partial update. Only provided fields are changed.
    pub async fn update(
        &self,
        id: i64,
        patch: &UpdateClientRequest,
    ) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                avatar_url = COALESCE($5, avatar_url),
                date_of_birth = COALESCE($6, date_of_birth),
                height_cm = COALESCE($7, height_cm),
                weight_kg = COALESCE($8, weight_kg),
                goals = COALESCE($9, goals),
                notes = COALESCE($10, notes),
                is_active = COALESCE($11, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.avatar_url)
        .bind(patch.date_of_birth)
        .bind(patch.height_cm)
        .bind(patch.weight_kg)
        .bind(&patch.goals)
        .bind(&patch.notes)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes a client. Dependent rows go with it through ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_client");
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
