//! Plan template repository.

use sqlx::{PgPool, Postgres, Transaction};

use domain::models::plan_template::{NewPlanTemplate, NewPlanTemplateItem};

use crate::entities::{PlanTemplateEntity, PlanTemplateItemEntity};
use crate::metrics::QueryTimer;

/// Weekday ordering with unassigned items last.
pub(crate) const DAY_ORDER_SQL: &str = r#"
    CASE day_of_week
        WHEN 'Monday' THEN 1
        WHEN 'Tuesday' THEN 2
        WHEN 'Wednesday' THEN 3
        WHEN 'Thursday' THEN 4
        WHEN 'Friday' THEN 5
        WHEN 'Saturday' THEN 6
        WHEN 'Sunday' THEN 7
        ELSE 8
    END
"#;

/// Repository for plan templates and their items.
#[derive(Clone)]
pub struct PlanTemplateRepository {
    pool: PgPool,
}

impl PlanTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, header: &NewPlanTemplate) -> Result<PlanTemplateEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_plan_template");
        let result = sqlx::query_as::<_, PlanTemplateEntity>(
            r#"
            INSERT INTO plan_templates (trainer_id, name, description, duration_weeks, days_per_week)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(header.trainer_id)
        .bind(&header.name)
        .bind(&header.description)
        .bind(header.duration_weeks)
        .bind(header.days_per_week)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn insert_items_tx(
        tx: &mut Transaction<'_, Postgres>,
        template_id: i64,
        items: &[NewPlanTemplateItem],
    ) -> Result<Vec<PlanTemplateItemEntity>, sqlx::Error> {
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, PlanTemplateItemEntity>(
                r#"
                INSERT INTO plan_template_items (plan_template_id, exercise_template_id,
                                                 day_of_week, exercise_order, custom_params, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(template_id)
            .bind(item.exercise_template_id)
            .bind(item.day_of_week.map(|d| d.as_str()))
            .bind(item.exercise_order)
            .bind(&item.custom_params)
            .bind(&item.notes)
            .fetch_one(&mut **tx)
            .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }

    /// Inserts every item in one transaction.
    pub async fn insert_items(
        &self,
        template_id: i64,
        items: &[NewPlanTemplateItem],
    ) -> Result<Vec<PlanTemplateItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_plan_template_items");
        let mut tx = self.pool.begin().await?;
        let inserted = Self::insert_items_tx(&mut tx, template_id, items).await?;
        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    /// Deletes the template's items and inserts `items`, atomically.
    pub async fn replace_items(
        &self,
        template_id: i64,
        items: &[NewPlanTemplateItem],
    ) -> Result<Vec<PlanTemplateItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_plan_template_items");
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM plan_template_items WHERE plan_template_id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;
        let inserted = Self::insert_items_tx(&mut tx, template_id, items).await?;
        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PlanTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_template_by_id");
        let result =
            sqlx::query_as::<_, PlanTemplateEntity>("SELECT * FROM plan_templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    pub async fn find_by_trainer(
        &self,
        trainer_id: i64,
    ) -> Result<Vec<PlanTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_templates_by_trainer");
        let result = sqlx::query_as::<_, PlanTemplateEntity>(
            r#"
            SELECT * FROM plan_templates
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

    pub async fn find_items(
        &self,
        template_id: i64,
    ) -> Result<Vec<PlanTemplateItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_template_items");
        let sql = format!(
            "SELECT * FROM plan_template_items WHERE plan_template_id = $1 \
             ORDER BY {}, exercise_order, id",
            DAY_ORDER_SQL
        );
        let result = sqlx::query_as::<_, PlanTemplateItemEntity>(&sql)
            .bind(template_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Replaces every header field.
    pub async fn update(
        &self,
        id: i64,
        header: &NewPlanTemplate,
    ) -> Result<Option<PlanTemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_plan_template");
        let result = sqlx::query_as::<_, PlanTemplateEntity>(
            r#"
            UPDATE plan_templates SET
                name = $2,
                description = $3,
                duration_weeks = $4,
                days_per_week = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&header.name)
        .bind(&header.description)
        .bind(header.duration_weeks)
        .bind(header.days_per_week)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes the template. Items go with it through ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_plan_template");
        let result = sqlx::query("DELETE FROM plan_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
