//! Client activity log repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::models::activity_log::{ActivityLogUpdate, ItemType, NewActivityLog};

use crate::entities::ActivityLogEntity;
use crate::metrics::QueryTimer;

/// Repository for logged calendar occurrences.
///
/// Rows are keyed by `(client_id, original_item_id, item_type)`; the
/// occurrence id is a calendar-generated string and carries no foreign key.
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        client_id: i64,
        original_item_id: &str,
        item_type: ItemType,
    ) -> Result<Option<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM client_activity_logs
            WHERE client_id = $1 AND original_item_id = $2 AND item_type = $3
            "#,
        )
        .bind(client_id)
        .bind(original_item_id)
        .bind(item_type.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn insert(&self, entry: &NewActivityLog) -> Result<ActivityLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            INSERT INTO client_activity_logs (client_id, original_item_id, item_type, title,
                                              scheduled_date, status, client_notes,
                                              completion_details, performed_at, source_item_table)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(entry.client_id)
        .bind(&entry.original_item_id)
        .bind(entry.item_type.as_str())
        .bind(&entry.title)
        .bind(entry.scheduled_date)
        .bind(entry.status.as_str())
        .bind(&entry.client_notes)
        .bind(&entry.completion_details)
        .bind(entry.performed_at)
        .bind(&entry.source_item_table)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        update: &ActivityLogUpdate,
    ) -> Result<Option<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            UPDATE client_activity_logs SET
                status = $2,
                client_notes = $3,
                completion_details = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.status.as_str())
        .bind(&update.client_notes)
        .bind(&update.completion_details)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_client(
        &self,
        client_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_logs_by_client");
        let result = sqlx::query_as::<_, ActivityLogEntity>(
            r#"
            SELECT * FROM client_activity_logs
            WHERE client_id = $1
              AND ($2::date IS NULL OR scheduled_date >= $2)
              AND ($3::date IS NULL OR scheduled_date <= $3)
            ORDER BY scheduled_date, id
            "#,
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
