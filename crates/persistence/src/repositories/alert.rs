//! Alert and branding repositories.

use sqlx::PgPool;

use domain::models::alert::NewAlert;
use domain::models::branding::UpsertBrandingRequest;

use crate::entities::{AlertEntity, BrandingEntity};
use crate::metrics::QueryTimer;

/// Repository for trainer alerts.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, alert: &NewAlert) -> Result<AlertEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_alert");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            INSERT INTO alerts (trainer_id, client_id, title, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(alert.trainer_id)
        .bind(alert.client_id)
        .bind(&alert.title)
        .bind(&alert.message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AlertEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_alert_by_id");
        let result = sqlx::query_as::<_, AlertEntity>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Alerts of a trainer, newest first.
    pub async fn find_by_trainer(
        &self,
        trainer_id: i64,
        unread_only: bool,
    ) -> Result<Vec<AlertEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_alerts_by_trainer");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            SELECT * FROM alerts
            WHERE trainer_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(trainer_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn mark_read(&self, id: i64) -> Result<Option<AlertEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_alert_read");
        let result = sqlx::query_as::<_, AlertEntity>(
            "UPDATE alerts SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_alert");
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

/// Repository for per-trainer branding.
#[derive(Clone)]
pub struct BrandingRepository {
    pool: PgPool,
}

impl BrandingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_trainer(
        &self,
        trainer_id: i64,
    ) -> Result<Option<BrandingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_branding_by_trainer");
        let result =
            sqlx::query_as::<_, BrandingEntity>("SELECT * FROM branding WHERE trainer_id = $1")
                .bind(trainer_id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Creates the trainer's branding or replaces every field of the existing row.
    pub async fn upsert(
        &self,
        trainer_id: i64,
        req: &UpsertBrandingRequest,
    ) -> Result<BrandingEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_branding");
        let result = sqlx::query_as::<_, BrandingEntity>(
            r#"
            INSERT INTO branding (trainer_id, logo_url, primary_color, secondary_color,
                                  message_tone, terms_of_service)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (trainer_id) DO UPDATE SET
                logo_url = EXCLUDED.logo_url,
                primary_color = EXCLUDED.primary_color,
                secondary_color = EXCLUDED.secondary_color,
                message_tone = EXCLUDED.message_tone,
                terms_of_service = EXCLUDED.terms_of_service,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(trainer_id)
        .bind(&req.logo_url)
        .bind(&req.primary_color)
        .bind(&req.secondary_color)
        .bind(req.message_tone.as_str())
        .bind(&req.terms_of_service)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
