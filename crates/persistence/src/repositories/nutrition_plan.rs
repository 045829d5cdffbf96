//! Assigned nutrition plan repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use domain::models::nutrition_plan::{NewNutritionPlan, NewNutritionPlanItem};

use crate::entities::{NutritionPlanEntity, NutritionPlanItemEntity};
use crate::metrics::QueryTimer;
use crate::repositories::plan_template::DAY_ORDER_SQL;

/// Repository for nutrition plans and their meal items.
#[derive(Clone)]
pub struct NutritionPlanRepository {
    pool: PgPool,
}

impl NutritionPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, plan: &NewNutritionPlan) -> Result<NutritionPlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_nutrition_plan");
        let result = sqlx::query_as::<_, NutritionPlanEntity>(
            r#"
            INSERT INTO nutrition_plans (client_id, trainer_id, name, description,
                                         start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(plan.client_id)
        .bind(plan.trainer_id)
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
        items: &[NewNutritionPlanItem],
    ) -> Result<Vec<NutritionPlanItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_nutrition_plan_items");
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, NutritionPlanItemEntity>(
                r#"
                INSERT INTO nutrition_plan_items (nutrition_plan_id, day_of_week, meal_type,
                                                  description, calories, protein_g, carbs_g,
                                                  fat_g, item_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(plan_id)
            .bind(item.day_of_week.map(|d| d.as_str()))
            .bind(&item.meal_type)
            .bind(&item.description)
            .bind(item.calories)
            .bind(item.protein_g)
            .bind(item.carbs_g)
            .bind(item.fat_g)
            .bind(item.item_order)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }
        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<NutritionPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_nutrition_plan_by_id");
        let result = sqlx::query_as::<_, NutritionPlanEntity>(
            "SELECT * FROM nutrition_plans WHERE id = $1",
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
    ) -> Result<Vec<NutritionPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_nutrition_plans_by_client");
        let result = sqlx::query_as::<_, NutritionPlanEntity>(
            r#"
            SELECT * FROM nutrition_plans
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
    ) -> Result<Vec<NutritionPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_nutrition_plans");
        let result = sqlx::query_as::<_, NutritionPlanEntity>(
            r#"
            SELECT * FROM nutrition_plans
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

    pub async fn find_items(
        &self,
        plan_ids: &[i64],
    ) -> Result<Vec<NutritionPlanItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_nutrition_plan_items");
        let sql = format!(
            "SELECT * FROM nutrition_plan_items WHERE nutrition_plan_id = ANY($1) \
             ORDER BY nutrition_plan_id, {}, item_order, id",
            DAY_ORDER_SQL
        );
        let result = sqlx::query_as::<_, NutritionPlanItemEntity>(&sql)
            .bind(plan_ids)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_nutrition_plan");
        let result = sqlx::query("DELETE FROM nutrition_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
