//! Measurement and goal repositories.

use sqlx::PgPool;

use domain::models::measurement::{NewGoal, NewMeasurement, UpdateGoalRequest};

use crate::entities::{GoalEntity, MeasurementEntity};
use crate::metrics::QueryTimer;

/// Repository for body measurements.
#[derive(Clone)]
pub struct MeasurementRepository {
    pool: PgPool,
}

impl MeasurementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, m: &NewMeasurement) -> Result<MeasurementEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_measurement");
        let result = sqlx::query_as::<_, MeasurementEntity>(
            r#"
            INSERT INTO measurements (client_id, measurement_date, weight_kg, body_fat_percentage,
                                      waist_cm, chest_cm, hips_cm, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(m.client_id)
        .bind(m.measurement_date)
        .bind(m.weight_kg)
        .bind(m.body_fat_percentage)
        .bind(m.waist_cm)
        .bind(m.chest_cm)
        .bind(m.hips_cm)
        .bind(&m.notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<MeasurementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_measurement_by_id");
        let result =
            sqlx::query_as::<_, MeasurementEntity>("SELECT * FROM measurements WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    pub async fn find_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<MeasurementEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_measurements_by_client");
        let result = sqlx::query_as::<_, MeasurementEntity>(
            r#"
            SELECT * FROM measurements
            WHERE client_id = $1
            ORDER BY measurement_date, id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_measurement");
        let result = sqlx::query("DELETE FROM measurements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

/// Repository for client goals.
#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, goal: &NewGoal) -> Result<GoalEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_goal");
        let result = sqlx::query_as::<_, GoalEntity>(
            r#"
            INSERT INTO goals (client_id, goal_description, target_value, current_value,
                               unit, target_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(goal.client_id)
        .bind(&goal.goal_description)
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(&goal.unit)
        .bind(goal.target_date)
        .bind(goal.status.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<GoalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_goal_by_id");
        let result = sqlx::query_as::<_, GoalEntity>("SELECT * FROM goals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_client(&self, client_id: i64) -> Result<Vec<GoalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_goals_by_client");
        let result = sqlx::query_as::<_, GoalEntity>(
            r#"
            SELECT * FROM goals
            WHERE client_id = $1
            ORDER BY target_date ASC NULLS LAST, created_at DESC, id DESC
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
        patch: &UpdateGoalRequest,
    ) -> Result<Option<GoalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_goal");
        let result = sqlx::query_as::<_, GoalEntity>(
            r#"
            UPDATE goals SET
                goal_description = COALESCE($2, goal_description),
                target_value = COALESCE($3, target_value),
                current_value = COALESCE($4, current_value),
                unit = COALESCE($5, unit),
                target_date = COALESCE($6, target_date),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.goal_description)
        .bind(patch.target_value)
        .bind(patch.current_value)
        .bind(&patch.unit)
        .bind(patch.target_date)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_goal");
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
