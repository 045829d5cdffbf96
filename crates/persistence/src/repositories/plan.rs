//! Freeform plan and client plan repositories.

use sqlx::PgPool;

use domain::models::plan::{CreateClientPlanRequest, UpdateClientPlanRequest, UpdatePlanRequest};
use domain::storage::NewPlan;

use crate::entities::{ClientPlanEntity, PlanEntity};
use crate::metrics::QueryTimer;

/// Repository for trainer-authored freeform plans.
#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, plan: &NewPlan) -> Result<PlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_plan");
        let result = sqlx::query_as::<_, PlanEntity>(
            r#"
            INSERT INTO plans (trainer_id, name, description, plan_type, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(plan.trainer_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.plan_type.as_str())
        .bind(&plan.content)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plan_by_id");
        let result = sqlx::query_as::<_, PlanEntity>("SELECT * FROM plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_trainer(&self, trainer_id: i64) -> Result<Vec<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plans_by_trainer");
        let result = sqlx::query_as::<_, PlanEntity>(
            r#"
            SELECT * FROM plans
            WHERE trainer_id = $1
            ORDER BY created_at DESC, id DESC
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
        patch: &UpdatePlanRequest,
    ) -> Result<Option<PlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_plan");
        let result = sqlx::query_as::<_, PlanEntity>(
            r#"
            UPDATE plans SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                plan_type = COALESCE($4, plan_type),
                content = COALESCE($5, content)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.plan_type.map(|t| t.as_str()))
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_plan");
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

/// Repository for plans assigned to clients.
#[derive(Clone)]
pub struct ClientPlanRepository {
    pool: PgPool,
}

impl ClientPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        req: &CreateClientPlanRequest,
    ) -> Result<ClientPlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_client_plan");
        let result = sqlx::query_as::<_, ClientPlanEntity>(
            r#"
            INSERT INTO client_plans (client_id, plan_id, start_date, end_date, is_active, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(req.client_id)
        .bind(req.plan_id)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.is_active)
        .bind(&req.notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ClientPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_plan_by_id");
        let result =
            sqlx::query_as::<_, ClientPlanEntity>("SELECT * FROM client_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    pub async fn find_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<ClientPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_plans_by_client");
        let result = sqlx::query_as::<_, ClientPlanEntity>(
            r#"
            SELECT * FROM client_plans
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

    pub async fn update(
        &self,
        id: i64,
        patch: &UpdateClientPlanRequest,
    ) -> Result<Option<ClientPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_client_plan");
        let result = sqlx::query_as::<_, ClientPlanEntity>(
            r#"
            UPDATE client_plans SET
                start_date = COALESCE($2, start_date),
                end_date = COALESCE($3, end_date),
                is_active = COALESCE($4, is_active),
                notes = COALESCE($5, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.is_active)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_client_plan");
        let result = sqlx::query("DELETE FROM client_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
