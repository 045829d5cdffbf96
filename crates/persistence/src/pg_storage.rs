//! PostgreSQL implementation of the domain storage port.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use domain::models::activity_log::{ActivityLogEntry, ActivityLogUpdate, ItemType, NewActivityLog};
use domain::models::alert::{Alert, NewAlert};
use domain::models::appointment::{
    Appointment, AppointmentWithClient, NewAppointment, UpdateAppointmentRequest,
};
use domain::models::branding::{Branding, UpsertBrandingRequest};
use domain::models::client::{Client, NewClient, UpdateClientRequest};
use domain::models::exercise::{ExerciseTemplate, ExerciseTemplatePatch, NewExerciseTemplate};
use domain::models::fitness_plan::{
    FitnessPlan, FitnessPlanDetails, FitnessPlanItem, NewFitnessPlan, NewFitnessPlanItem,
};
use domain::models::measurement::{Goal, Measurement, NewGoal, NewMeasurement, UpdateGoalRequest};
use domain::models::nutrition_plan::{
    NewNutritionPlan, NewNutritionPlanItem, NutritionPlan, NutritionPlanDetails,
    NutritionPlanItem,
};
use domain::models::payment::{
    NewPayment, NewProgressEntry, Payment, ProgressEntry, UpdatePaymentRequest,
    UpdateProgressRequest,
};
use domain::models::plan::{
    ClientPlan, CreateClientPlanRequest, Plan, UpdateClientPlanRequest, UpdatePlanRequest,
};
use domain::models::plan_template::{
    NewPlanTemplate, NewPlanTemplateItem, PlanTemplate, PlanTemplateItem,
};
use domain::models::user::{NewUser, User};
use domain::storage::{NewPlan, Storage, StorageResult};

use crate::error::db_err;
use crate::metrics::record_pool_metrics;
use crate::repositories::{
    ActivityLogRepository, AlertRepository, AppointmentRepository, BrandingRepository,
    ClientPlanRepository, ClientRepository, ExerciseTemplateRepository, FitnessPlanRepository,
    GoalRepository, MeasurementRepository, NutritionPlanRepository, PaymentRepository,
    PlanRepository, PlanTemplateRepository, ProgressRepository, UserRepository,
};

fn all<E, T: From<E>>(rows: Vec<E>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}

/// Groups plan rows with their item rows, keeping the plan order.
fn group_items<P, I>(
    plans: Vec<P>,
    items: Vec<I>,
    plan_id: impl Fn(&P) -> i64,
    item_plan_id: impl Fn(&I) -> i64,
) -> Vec<(P, Vec<I>)> {
    let mut by_plan: HashMap<i64, Vec<I>> = HashMap::new();
    for item in items {
        by_plan.entry(item_plan_id(&item)).or_default().push(item);
    }
    plans
        .into_iter()
        .map(|plan| {
            let items = by_plan.remove(&plan_id(&plan)).unwrap_or_default();
            (plan, items)
        })
        .collect()
}

/// Storage backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
    users: UserRepository,
    clients: ClientRepository,
    plans: PlanRepository,
    client_plans: ClientPlanRepository,
    payments: PaymentRepository,
    progress: ProgressRepository,
    alerts: AlertRepository,
    branding: BrandingRepository,
    exercises: ExerciseTemplateRepository,
    plan_templates: PlanTemplateRepository,
    fitness_plans: FitnessPlanRepository,
    nutrition_plans: NutritionPlanRepository,
    appointments: AppointmentRepository,
    measurements: MeasurementRepository,
    goals: GoalRepository,
    activity_logs: ActivityLogRepository,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            client_plans: ClientPlanRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool.clone()),
            alerts: AlertRepository::new(pool.clone()),
            branding: BrandingRepository::new(pool.clone()),
            exercises: ExerciseTemplateRepository::new(pool.clone()),
            plan_templates: PlanTemplateRepository::new(pool.clone()),
            fitness_plans: FitnessPlanRepository::new(pool.clone()),
            nutrition_plans: NutritionPlanRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool.clone()),
            measurements: MeasurementRepository::new(pool.clone()),
            goals: GoalRepository::new(pool.clone()),
            activity_logs: ActivityLogRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        Ok(self.users.create(&user).await.map_err(db_err)?.into())
    }

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.users.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn create_client(&self, client: NewClient) -> StorageResult<Client> {
        Ok(self.clients.create(&client).await.map_err(db_err)?.into())
    }

    async fn get_client(&self, id: i64) -> StorageResult<Option<Client>> {
        Ok(self.clients.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_clients(&self, trainer_id: i64) -> StorageResult<Vec<Client>> {
        Ok(all(self.clients.find_by_trainer(trainer_id).await.map_err(db_err)?))
    }

    async fn update_client(
        &self,
        id: i64,
        patch: &UpdateClientRequest,
    ) -> StorageResult<Option<Client>> {
        Ok(self.clients.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_client(&self, id: i64) -> StorageResult<bool> {
        Ok(self.clients.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_plan(&self, plan: NewPlan) -> StorageResult<Plan> {
        Ok(self.plans.create(&plan).await.map_err(db_err)?.into())
    }

    async fn get_plan(&self, id: i64) -> StorageResult<Option<Plan>> {
        Ok(self.plans.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_plans(&self, trainer_id: i64) -> StorageResult<Vec<Plan>> {
        Ok(all(self.plans.find_by_trainer(trainer_id).await.map_err(db_err)?))
    }

    async fn update_plan(
        &self,
        id: i64,
        patch: &UpdatePlanRequest,
    ) -> StorageResult<Option<Plan>> {
        Ok(self.plans.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_plan(&self, id: i64) -> StorageResult<bool> {
        Ok(self.plans.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_client_plan(
        &self,
        req: &CreateClientPlanRequest,
    ) -> StorageResult<ClientPlan> {
        Ok(self.client_plans.create(req).await.map_err(db_err)?.into())
    }

    async fn get_client_plan(&self, id: i64) -> StorageResult<Option<ClientPlan>> {
        Ok(self
            .client_plans
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_client_plans(&self, client_id: i64) -> StorageResult<Vec<ClientPlan>> {
        Ok(all(
            self.client_plans
                .find_by_client(client_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn update_client_plan(
        &self,
        id: i64,
        patch: &UpdateClientPlanRequest,
    ) -> StorageResult<Option<ClientPlan>> {
        Ok(self
            .client_plans
            .update(id, patch)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn delete_client_plan(&self, id: i64) -> StorageResult<bool> {
        Ok(self.client_plans.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_payment(&self, payment: NewPayment) -> StorageResult<Payment> {
        Ok(self.payments.create(&payment).await.map_err(db_err)?.into())
    }

    async fn get_payment(&self, id: i64) -> StorageResult<Option<Payment>> {
        Ok(self.payments.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_payments_for_client(&self, client_id: i64) -> StorageResult<Vec<Payment>> {
        Ok(all(self.payments.find_by_client(client_id).await.map_err(db_err)?))
    }

    async fn list_payments_for_trainer(&self, trainer_id: i64) -> StorageResult<Vec<Payment>> {
        Ok(all(self.payments.find_by_trainer(trainer_id).await.map_err(db_err)?))
    }

    async fn update_payment(
        &self,
        id: i64,
        patch: &UpdatePaymentRequest,
    ) -> StorageResult<Option<Payment>> {
        Ok(self.payments.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_payment(&self, id: i64) -> StorageResult<bool> {
        Ok(self.payments.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_progress(&self, entry: NewProgressEntry) -> StorageResult<ProgressEntry> {
        Ok(self.progress.create(&entry).await.map_err(db_err)?.into())
    }

    async fn get_progress(&self, id: i64) -> StorageResult<Option<ProgressEntry>> {
        Ok(self.progress.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_progress(&self, client_id: i64) -> StorageResult<Vec<ProgressEntry>> {
        Ok(all(self.progress.find_by_client(client_id).await.map_err(db_err)?))
    }

    async fn update_progress(
        &self,
        id: i64,
        patch: &UpdateProgressRequest,
    ) -> StorageResult<Option<ProgressEntry>> {
        Ok(self.progress.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_progress(&self, id: i64) -> StorageResult<bool> {
        Ok(self.progress.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_alert(&self, alert: NewAlert) -> StorageResult<Alert> {
        Ok(self.alerts.create(&alert).await.map_err(db_err)?.into())
    }

    async fn get_alert(&self, id: i64) -> StorageResult<Option<Alert>> {
        Ok(self.alerts.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_alerts(&self, trainer_id: i64, unread_only: bool) -> StorageResult<Vec<Alert>> {
        Ok(all(
            self.alerts
                .find_by_trainer(trainer_id, unread_only)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn mark_alert_read(&self, id: i64) -> StorageResult<Option<Alert>> {
        Ok(self.alerts.mark_read(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_alert(&self, id: i64) -> StorageResult<bool> {
        Ok(self.alerts.delete(id).await.map_err(db_err)? > 0)
    }

    async fn get_branding(&self, trainer_id: i64) -> StorageResult<Option<Branding>> {
        Ok(self
            .branding
            .find_by_trainer(trainer_id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn upsert_branding(
        &self,
        trainer_id: i64,
        req: &UpsertBrandingRequest,
    ) -> StorageResult<Branding> {
        Ok(self.branding.upsert(trainer_id, req).await.map_err(db_err)?.into())
    }

    async fn create_exercise_template(
        &self,
        template: NewExerciseTemplate,
    ) -> StorageResult<ExerciseTemplate> {
        Ok(self.exercises.create(&template).await.map_err(db_err)?.into())
    }

    async fn get_exercise_template(&self, id: i64) -> StorageResult<Option<ExerciseTemplate>> {
        Ok(self.exercises.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_exercise_templates(
        &self,
        trainer_id: i64,
    ) -> StorageResult<Vec<ExerciseTemplate>> {
        Ok(all(self.exercises.find_visible(trainer_id).await.map_err(db_err)?))
    }

    async fn update_exercise_template(
        &self,
        id: i64,
        patch: &ExerciseTemplatePatch,
    ) -> StorageResult<Option<ExerciseTemplate>> {
        Ok(self.exercises.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_exercise_template(&self, id: i64) -> StorageResult<bool> {
        Ok(self.exercises.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_plan_template(
        &self,
        template: NewPlanTemplate,
    ) -> StorageResult<PlanTemplate> {
        Ok(self.plan_templates.create(&template).await.map_err(db_err)?.into())
    }

    async fn insert_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        Ok(all(
            self.plan_templates
                .insert_items(template_id, &items)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn get_plan_template(&self, id: i64) -> StorageResult<Option<PlanTemplate>> {
        Ok(self
            .plan_templates
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_plan_templates(&self, trainer_id: i64) -> StorageResult<Vec<PlanTemplate>> {
        Ok(all(
            self.plan_templates
                .find_by_trainer(trainer_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn list_plan_template_items(
        &self,
        template_id: i64,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        Ok(all(
            self.plan_templates
                .find_items(template_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn update_plan_template(
        &self,
        id: i64,
        header: NewPlanTemplate,
    ) -> StorageResult<Option<PlanTemplate>> {
        Ok(self
            .plan_templates
            .update(id, &header)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn replace_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        Ok(all(
            self.plan_templates
                .replace_items(template_id, &items)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn delete_plan_template(&self, id: i64) -> StorageResult<bool> {
        Ok(self.plan_templates.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_fitness_plan(&self, plan: NewFitnessPlan) -> StorageResult<FitnessPlan> {
        Ok(self.fitness_plans.create(&plan).await.map_err(db_err)?.into())
    }

    async fn insert_fitness_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewFitnessPlanItem>,
    ) -> StorageResult<Vec<FitnessPlanItem>> {
        Ok(all(
            self.fitness_plans
                .insert_items(plan_id, &items)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn get_fitness_plan(&self, id: i64) -> StorageResult<Option<FitnessPlan>> {
        Ok(self
            .fitness_plans
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_fitness_plans(&self, client_id: i64) -> StorageResult<Vec<FitnessPlan>> {
        Ok(all(
            self.fitness_plans
                .find_by_client(client_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn list_fitness_plan_items(&self, plan_id: i64) -> StorageResult<Vec<FitnessPlanItem>> {
        Ok(all(
            self.fitness_plans
                .find_items(&[plan_id])
                .await
                .map_err(db_err)?,
        ))
    }

    async fn delete_fitness_plan(&self, id: i64) -> StorageResult<bool> {
        Ok(self.fitness_plans.delete(id).await.map_err(db_err)? > 0)
    }

    async fn list_active_fitness_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<FitnessPlanDetails>> {
        let plans = self
            .fitness_plans
            .find_active_in_range(client_id, start, end)
            .await
            .map_err(db_err)?;
        if plans.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = plans.iter().map(|p| p.id).collect();
        let items = self.fitness_plans.find_items(&ids).await.map_err(db_err)?;
        Ok(group_items(plans, items, |p| p.id, |i| i.fitness_plan_id)
            .into_iter()
            .map(|(plan, items)| FitnessPlanDetails {
                plan: plan.into(),
                items: all(items),
            })
            .collect())
    }

    async fn create_nutrition_plan(
        &self,
        plan: NewNutritionPlan,
    ) -> StorageResult<NutritionPlan> {
        Ok(self.nutrition_plans.create(&plan).await.map_err(db_err)?.into())
    }

    async fn insert_nutrition_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewNutritionPlanItem>,
    ) -> StorageResult<Vec<NutritionPlanItem>> {
        Ok(all(
            self.nutrition_plans
                .insert_items(plan_id, &items)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn get_nutrition_plan(&self, id: i64) -> StorageResult<Option<NutritionPlan>> {
        Ok(self
            .nutrition_plans
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_nutrition_plans(&self, client_id: i64) -> StorageResult<Vec<NutritionPlan>> {
        Ok(all(
            self.nutrition_plans
                .find_by_client(client_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn list_nutrition_plan_items(
        &self,
        plan_id: i64,
    ) -> StorageResult<Vec<NutritionPlanItem>> {
        Ok(all(
            self.nutrition_plans
                .find_items(&[plan_id])
                .await
                .map_err(db_err)?,
        ))
    }

    async fn delete_nutrition_plan(&self, id: i64) -> StorageResult<bool> {
        Ok(self.nutrition_plans.delete(id).await.map_err(db_err)? > 0)
    }

    async fn list_active_nutrition_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<NutritionPlanDetails>> {
        let plans = self
            .nutrition_plans
            .find_active_in_range(client_id, start, end)
            .await
            .map_err(db_err)?;
        if plans.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = plans.iter().map(|p| p.id).collect();
        let items = self.nutrition_plans.find_items(&ids).await.map_err(db_err)?;
        Ok(group_items(plans, items, |p| p.id, |i| i.nutrition_plan_id)
            .into_iter()
            .map(|(plan, items)| NutritionPlanDetails {
                plan: plan.into(),
                items: all(items),
            })
            .collect())
    }

    async fn create_appointment(&self, appt: NewAppointment) -> StorageResult<Appointment> {
        Ok(self.appointments.create(&appt).await.map_err(db_err)?.into())
    }

    async fn get_appointment(&self, id: i64) -> StorageResult<Option<Appointment>> {
        Ok(self
            .appointments
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_appointments_for_trainer(
        &self,
        trainer_id: i64,
    ) -> StorageResult<Vec<AppointmentWithClient>> {
        Ok(all(
            self.appointments
                .find_by_trainer_with_client(trainer_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn list_appointments_for_client(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StorageResult<Vec<Appointment>> {
        Ok(all(
            self.appointments
                .find_by_client_between(client_id, from, until)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn update_appointment(
        &self,
        id: i64,
        patch: &UpdateAppointmentRequest,
    ) -> StorageResult<Option<Appointment>> {
        Ok(self
            .appointments
            .update(id, patch)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn delete_appointment(&self, id: i64) -> StorageResult<bool> {
        Ok(self.appointments.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_measurement(&self, m: NewMeasurement) -> StorageResult<Measurement> {
        Ok(self.measurements.create(&m).await.map_err(db_err)?.into())
    }

    async fn get_measurement(&self, id: i64) -> StorageResult<Option<Measurement>> {
        Ok(self
            .measurements
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_measurements(&self, client_id: i64) -> StorageResult<Vec<Measurement>> {
        Ok(all(
            self.measurements
                .find_by_client(client_id)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn delete_measurement(&self, id: i64) -> StorageResult<bool> {
        Ok(self.measurements.delete(id).await.map_err(db_err)? > 0)
    }

    async fn create_goal(&self, goal: NewGoal) -> StorageResult<Goal> {
        Ok(self.goals.create(&goal).await.map_err(db_err)?.into())
    }

    async fn get_goal(&self, id: i64) -> StorageResult<Option<Goal>> {
        Ok(self.goals.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_goals(&self, client_id: i64) -> StorageResult<Vec<Goal>> {
        Ok(all(self.goals.find_by_client(client_id).await.map_err(db_err)?))
    }

    async fn update_goal(
        &self,
        id: i64,
        patch: &UpdateGoalRequest,
    ) -> StorageResult<Option<Goal>> {
        Ok(self.goals.update(id, patch).await.map_err(db_err)?.map(Into::into))
    }

    async fn delete_goal(&self, id: i64) -> StorageResult<bool> {
        Ok(self.goals.delete(id).await.map_err(db_err)? > 0)
    }

    async fn find_activity_log(
        &self,
        client_id: i64,
        original_item_id: &str,
        item_type: ItemType,
    ) -> StorageResult<Option<ActivityLogEntry>> {
        Ok(self
            .activity_logs
            .find(client_id, original_item_id, item_type)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn insert_activity_log(&self, entry: NewActivityLog) -> StorageResult<ActivityLogEntry> {
        Ok(self.activity_logs.insert(&entry).await.map_err(db_err)?.into())
    }

    async fn update_activity_log(
        &self,
        id: i64,
        update: &ActivityLogUpdate,
    ) -> StorageResult<Option<ActivityLogEntry>> {
        Ok(self
            .activity_logs
            .update(id, update)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn list_activity_logs(
        &self,
        client_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> StorageResult<Vec<ActivityLogEntry>> {
        Ok(all(
            self.activity_logs
                .find_by_client(client_id, start, end)
                .await
                .map_err(db_err)?,
        ))
    }

    async fn ping(&self) -> StorageResult<()> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
