//! Assigned fitness plan repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::models::fitness_plan::{NewFitnessPlan, NewFitnessPlanItem};

use crate::entities::{FitnessPlanEntity, FitnessPlanItemEntity};
use crate::metrics::QueryTimer;
use crate::repositories::plan_template::DAY_ORDER_SQL;

/// Repository for fitness plans and their denormalized items.
#[derive(Clone)]
pub struct FitnessPlanRepository {
    pool: PgPool,
}

impl FitnessPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, plan: &NewFitnessPlan) -> Result<FitnessPlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_fitness_plan");
        let result = sqlx::query_as::<_, FitnessPlanEntity>(
            r#"
            INSERT INTO fitness_plans (client_id, trainer_id, source_plan_template_id, name,
                                       description, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(plan.client_id)
        .bind(plan.trainer_id)
        .bind(plan.source_plan_template_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inserts every item in one transaction.
    pub async fn insert_items(
        &self,
        plan_id: i64,
        items: &[NewFitnessPlanItem],
    ) -> Result<Vec<FitnessPlanItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_fitness_plan_items");
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, FitnessPlanItemEntity>(
                r#"
                INSERT INTO fitness_plan_items (fitness_plan_id, exercise_template_id,
                                                exercise_name, day_of_week, exercise_order,
                                                custom_params, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(plan_id)
            .bind(item.exercise_template_id)
            .bind(&item.exercise_name)
            .bind(item.day_of_week.map(|d| d.as_str()))
            .bind(item.exercise_order)
            .bind(&item.custom_params)
            .bind(&item.notes)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }
        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<FitnessPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_fitness_plan_by_id");
        let result =
            sqlx::query_as::<_, FitnessPlanEntity>("SELECT * FROM fitness_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Plans of a client, newest start date first.
    pub async fn find_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<FitnessPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_fitness_plans_by_client");
        let result = sqlx::query_as::<_, FitnessPlanEntity>(
            r#"
            SELECT * FROM fitness_plans
            WHERE client_id = $1
            ORDER BY start_date DESC, id DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active plans whose window overlaps `[start, end]`.
    pub async fn find_active_in_range(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FitnessPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_fitness_plans");
        let result = sqlx::query_as::<_, FitnessPlanEntity>(
            r#"
            SELECT * FROM fitness_plans
            WHERE client_id = $1
              AND is_active = TRUE
              AND start_date <= $3
              AND (end_date IS NULL OR end_date >= $2)
            ORDER BY start_date, id
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

    /// Items of the given plans, by plan, day and order.
    pub async fn find_items(
        &self,
        plan_ids: &[i64],
    ) -> Result<Vec<FitnessPlanItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_fitness_plan_items");
        let sql = format!(
            "SELECT * FROM fitness_plan_items WHERE fitness_plan_id = ANY($1) \
             ORDER BY fitness_plan_id, {}, exercise_order, id",
            DAY_ORDER_SQL
        );
        let result = sqlx::query_as::<_, FitnessPlanItemEntity>(&sql)
            .bind(plan_ids)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_fitness_plan");
        let result = sqlx::query("DELETE FROM fitness_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
