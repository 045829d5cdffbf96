//! Appointment repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::models::appointment::{NewAppointment, UpdateAppointmentRequest};

use crate::entities::{AppointmentEntity, AppointmentWithClientEntity};
use crate::metrics::QueryTimer;

/// Repository for trainer appointments.
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, appt: &NewAppointment) -> Result<AppointmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_appointment");
        let result = sqlx::query_as::<_, AppointmentEntity>(
            r#"
            INSERT INTO appointments (trainer_id, client_id, title, description,
                                      appointment_type, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(appt.trainer_id)
        .bind(appt.client_id)
        .bind(&appt.title)
        .bind(&appt.description)
        .bind(&appt.appointment_type)
        .bind(appt.start_time)
        .bind(appt.end_time)
        .bind(appt.status.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_appointment_by_id");
        let result =
            sqlx::query_as::<_, AppointmentEntity>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Every appointment of the trainer joined with the client's name.
    pub async fn find_by_trainer_with_client(
        &self,
        trainer_id: i64,
    ) -> Result<Vec<AppointmentWithClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_appointments_by_trainer");
        let result = sqlx::query_as::<_, AppointmentWithClientEntity>(
            r#"
            SELECT a.*, c.name AS client_name
            FROM appointments a
            JOIN clients c ON c.id = a.client_id
            WHERE a.trainer_id = $1
            ORDER BY a.start_time, a.id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Appointments of a client overlapping `[from, until)`.
    pub async fn find_by_client_between(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<AppointmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_appointments_by_client");
        let result = sqlx::query_as::<_, AppointmentEntity>(
            r#"
            SELECT * FROM appointments
            WHERE client_id = $1 AND start_time < $3 AND end_time > $2
            ORDER BY start_time, id
            "#,
        )
        .bind(client_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &UpdateAppointmentRequest,
    ) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_appointment");
        let result = sqlx::query_as::<_, AppointmentEntity>(
            r#"
            UPDATE appointments SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                appointment_type = COALESCE($4, appointment_type),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                status = COALESCE($7, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.appointment_type)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_appointment");
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
