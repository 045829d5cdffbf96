//! Payment and progress-entry repositories.

use sqlx::PgPool;

use domain::models::payment::{
    NewPayment, NewProgressEntry, UpdatePaymentRequest, UpdateProgressRequest,
};

use crate::entities::{PaymentEntity, ProgressEntryEntity};
use crate::metrics::QueryTimer;

/// Repository for client payments.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payment: &NewPayment) -> Result<PaymentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_payment");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            INSERT INTO payments (client_id, amount, description, date, is_paid)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(payment.client_id)
        .bind(payment.amount)
        .bind(&payment.description)
        .bind(payment.date)
        .bind(payment.is_paid)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payment_by_id");
        let result = sqlx::query_as::<_, PaymentEntity>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Payments of one client, newest first.
    pub async fn find_by_client(&self, client_id: i64) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payments_by_client");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT * FROM payments
            WHERE client_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Payments of every client of a trainer, newest first.
    pub async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payments_by_trainer");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT p.* FROM payments p
            JOIN clients c ON c.id = p.client_id
            WHERE c.trainer_id = $1
            ORDER BY p.date DESC, p.id DESC
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &UpdatePaymentRequest,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_payment");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            UPDATE payments SET
                amount = COALESCE($2, amount),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                is_paid = COALESCE($5, is_paid)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.amount)
        .bind(&patch.description)
        .bind(patch.date)
        .bind(patch.is_paid)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_payment");
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

/// Repository for free-form progress entries.
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: &NewProgressEntry) -> Result<ProgressEntryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_progress_entry");
        let result = sqlx::query_as::<_, ProgressEntryEntity>(
            r#"
            INSERT INTO progress_entries (client_id, date, metrics, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(entry.client_id)
        .bind(entry.date)
        .bind(&entry.metrics)
        .bind(&entry.notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProgressEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_progress_entry_by_id");
        let result = sqlx::query_as::<_, ProgressEntryEntity>(
            "SELECT * FROM progress_entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<ProgressEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_progress_entries_by_client");
        let result = sqlx::query_as::<_, ProgressEntryEntity>(
            r#"
            SELECT * FROM progress_entries
            WHERE client_id = $1
            ORDER BY date, id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &UpdateProgressRequest,
    ) -> Result<Option<ProgressEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_progress_entry");
        let result = sqlx::query_as::<_, ProgressEntryEntity>(
            r#"
            UPDATE progress_entries SET
                date = COALESCE($2, date),
                metrics = COALESCE($3, metrics),
                notes = COALESCE($4, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.date)
        .bind(&patch.metrics)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_progress_entry");
        let result = sqlx::query("DELETE FROM progress_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
