//! Storage port.
//!
//! Services talk to the data store only through this trait. Methods do no
//! ownership checks; callers scope reads and writes to the session's trainer
//! or client. `update_*` and `delete_*` return `None`/`false` when the row
//! does not exist.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StorageError;
use crate::models::activity_log::{
    ActivityLogEntry, ActivityLogUpdate, ItemType, NewActivityLog,
};
use crate::models::alert::{Alert, NewAlert};
use crate::models::appointment::{
    Appointment, AppointmentWithClient, NewAppointment, UpdateAppointmentRequest,
};
use crate::models::branding::{Branding, UpsertBrandingRequest};
use crate::models::client::{Client, NewClient, UpdateClientRequest};
use crate::models::exercise::{ExerciseTemplate, ExerciseTemplatePatch, NewExerciseTemplate};
use crate::models::fitness_plan::{
    FitnessPlan, FitnessPlanDetails, FitnessPlanItem, NewFitnessPlan, NewFitnessPlanItem,
};
use crate::models::measurement::{Goal, Measurement, NewGoal, NewMeasurement, UpdateGoalRequest};
use crate::models::nutrition_plan::{
    NewNutritionPlan, NewNutritionPlanItem, NutritionPlan, NutritionPlanDetails,
    NutritionPlanItem,
};
use crate::models::payment::{
    NewPayment, NewProgressEntry, Payment, ProgressEntry, UpdatePaymentRequest,
    UpdateProgressRequest,
};
use crate::models::plan::{
    ClientPlan, CreateClientPlanRequest, CreatePlanRequest, Plan, PlanType,
    UpdateClientPlanRequest, UpdatePlanRequest,
};
use crate::models::plan_template::{
    NewPlanTemplate, NewPlanTemplateItem, PlanTemplate, PlanTemplateItem,
};
use crate::models::user::{NewUser, User};

pub type StorageResult<T> = Result<T, StorageError>;

/// Fields of a new freeform plan.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub trainer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub plan_type: PlanType,
    pub content: serde_json::Value,
}

impl NewPlan {
    pub fn from_request(trainer_id: i64, req: CreatePlanRequest) -> Self {
        Self {
            trainer_id,
            name: req.name,
            description: req.description,
            plan_type: req.plan_type,
            content: req.content,
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;
    async fn get_user(&self, id: i64) -> StorageResult<Option<User>>;

    // Clients
    async fn create_client(&self, client: NewClient) -> StorageResult<Client>;
    async fn get_client(&self, id: i64) -> StorageResult<Option<Client>>;
    /// Ordered by name.
    async fn list_clients(&self, trainer_id: i64) -> StorageResult<Vec<Client>>;
    async fn update_client(
        &self,
        id: i64,
        patch: &UpdateClientRequest,
    ) -> StorageResult<Option<Client>>;
    /// Removes the client and every row that belongs to it.
    async fn delete_client(&self, id: i64) -> StorageResult<bool>;

    // Freeform plans
    async fn create_plan(&self, plan: NewPlan) -> StorageResult<Plan>;
    async fn get_plan(&self, id: i64) -> StorageResult<Option<Plan>>;
    async fn list_plans(&self, trainer_id: i64) -> StorageResult<Vec<Plan>>;
    async fn update_plan(&self, id: i64, patch: &UpdatePlanRequest)
        -> StorageResult<Option<Plan>>;
    async fn delete_plan(&self, id: i64) -> StorageResult<bool>;

    // Client plans
    async fn create_client_plan(&self, req: &CreateClientPlanRequest)
        -> StorageResult<ClientPlan>;
    async fn get_client_plan(&self, id: i64) -> StorageResult<Option<ClientPlan>>;
    async fn list_client_plans(&self, client_id: i64) -> StorageResult<Vec<ClientPlan>>;
    async fn update_client_plan(
        &self,
        id: i64,
        patch: &UpdateClientPlanRequest,
    ) -> StorageResult<Option<ClientPlan>>;
    async fn delete_client_plan(&self, id: i64) -> StorageResult<bool>;

    // Payments
    async fn create_payment(&self, payment: NewPayment) -> StorageResult<Payment>;
    async fn get_payment(&self, id: i64) -> StorageResult<Option<Payment>>;
    /// Newest first.
    async fn list_payments_for_client(&self, client_id: i64) -> StorageResult<Vec<Payment>>;
    /// Payments of every client of the trainer, newest first.
    async fn list_payments_for_trainer(&self, trainer_id: i64) -> StorageResult<Vec<Payment>>;
    async fn update_payment(
        &self,
        id: i64,
        patch: &UpdatePaymentRequest,
    ) -> StorageResult<Option<Payment>>;
    async fn delete_payment(&self, id: i64) -> StorageResult<bool>;

    // Progress tracking
    async fn create_progress(&self, entry: NewProgressEntry) -> StorageResult<ProgressEntry>;
    async fn get_progress(&self, id: i64) -> StorageResult<Option<ProgressEntry>>;
    /// Ordered by date.
    async fn list_progress(&self, client_id: i64) -> StorageResult<Vec<ProgressEntry>>;
    async fn update_progress(
        &self,
        id: i64,
        patch: &UpdateProgressRequest,
    ) -> StorageResult<Option<ProgressEntry>>;
    async fn delete_progress(&self, id: i64) -> StorageResult<bool>;

    // Alerts
    async fn create_alert(&self, alert: NewAlert) -> StorageResult<Alert>;
    async fn get_alert(&self, id: i64) -> StorageResult<Option<Alert>>;
    /// Newest first.
    async fn list_alerts(&self, trainer_id: i64, unread_only: bool) -> StorageResult<Vec<Alert>>;
    async fn mark_alert_read(&self, id: i64) -> StorageResult<Option<Alert>>;
    async fn delete_alert(&self, id: i64) -> StorageResult<bool>;

    // Branding
    async fn get_branding(&self, trainer_id: i64) -> StorageResult<Option<Branding>>;
    async fn upsert_branding(
        &self,
        trainer_id: i64,
        req: &UpsertBrandingRequest,
    ) -> StorageResult<Branding>;

    // Exercise library
    async fn create_exercise_template(
        &self,
        template: NewExerciseTemplate,
    ) -> StorageResult<ExerciseTemplate>;
    async fn get_exercise_template(&self, id: i64) -> StorageResult<Option<ExerciseTemplate>>;
    /// The trainer's own templates by name, followed by global templates by name.
    async fn list_exercise_templates(&self, trainer_id: i64)
        -> StorageResult<Vec<ExerciseTemplate>>;
    async fn update_exercise_template(
        &self,
        id: i64,
        patch: &ExerciseTemplatePatch,
    ) -> StorageResult<Option<ExerciseTemplate>>;
    async fn delete_exercise_template(&self, id: i64) -> StorageResult<bool>;

    // Plan templates
    async fn create_plan_template(&self, template: NewPlanTemplate)
        -> StorageResult<PlanTemplate>;
    async fn insert_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>>;
    async fn get_plan_template(&self, id: i64) -> StorageResult<Option<PlanTemplate>>;
    /// Ordered by name.
    async fn list_plan_templates(&self, trainer_id: i64) -> StorageResult<Vec<PlanTemplate>>;
    /// Ordered by day then `exercise_order`; unassigned items last.
    async fn list_plan_template_items(
        &self,
        template_id: i64,
    ) -> StorageResult<Vec<PlanTemplateItem>>;
    async fn update_plan_template(
        &self,
        id: i64,
        header: NewPlanTemplate,
    ) -> StorageResult<Option<PlanTemplate>>;
    /// Deletes every item of the template, then inserts `items`.
    async fn replace_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>>;
    /// Deletes the template together with its items.
    async fn delete_plan_template(&self, id: i64) -> StorageResult<bool>;

    // Assigned fitness plans
    async fn create_fitness_plan(&self, plan: NewFitnessPlan) -> StorageResult<FitnessPlan>;
    async fn insert_fitness_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewFitnessPlanItem>,
    ) -> StorageResult<Vec<FitnessPlanItem>>;
    async fn get_fitness_plan(&self, id: i64) -> StorageResult<Option<FitnessPlan>>;
    /// Newest start date first.
    async fn list_fitness_plans(&self, client_id: i64) -> StorageResult<Vec<FitnessPlan>>;
    async fn list_fitness_plan_items(&self, plan_id: i64) -> StorageResult<Vec<FitnessPlanItem>>;
    async fn delete_fitness_plan(&self, id: i64) -> StorageResult<bool>;
    /// Active plans of the client whose window overlaps `[start, end]`, with items.
    async fn list_active_fitness_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<FitnessPlanDetails>>;

    // Assigned nutrition plans
    async fn create_nutrition_plan(&self, plan: NewNutritionPlan)
        -> StorageResult<NutritionPlan>;
    async fn insert_nutrition_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewNutritionPlanItem>,
    ) -> StorageResult<Vec<NutritionPlanItem>>;
    async fn get_nutrition_plan(&self, id: i64) -> StorageResult<Option<NutritionPlan>>;
    async fn list_nutrition_plans(&self, client_id: i64) -> StorageResult<Vec<NutritionPlan>>;
    async fn list_nutrition_plan_items(
        &self,
        plan_id: i64,
    ) -> StorageResult<Vec<NutritionPlanItem>>;
    async fn delete_nutrition_plan(&self, id: i64) -> StorageResult<bool>;
    async fn list_active_nutrition_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<NutritionPlanDetails>>;

    // Appointments
    async fn create_appointment(&self, appt: NewAppointment) -> StorageResult<Appointment>;
    async fn get_appointment(&self, id: i64) -> StorageResult<Option<Appointment>>;
    /// Ordered by start time, joined with the client's name.
    async fn list_appointments_for_trainer(
        &self,
        trainer_id: i64,
    ) -> StorageResult<Vec<AppointmentWithClient>>;
    /// Appointments overlapping `[from, until)`, ordered by start time.
    async fn list_appointments_for_client(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StorageResult<Vec<Appointment>>;
    async fn update_appointment(
        &self,
        id: i64,
        patch: &UpdateAppointmentRequest,
    ) -> StorageResult<Option<Appointment>>;
    async fn delete_appointment(&self, id: i64) -> StorageResult<bool>;

    // Measurements
    async fn create_measurement(&self, m: NewMeasurement) -> StorageResult<Measurement>;
    async fn get_measurement(&self, id: i64) -> StorageResult<Option<Measurement>>;
    /// Oldest first.
    async fn list_measurements(&self, client_id: i64) -> StorageResult<Vec<Measurement>>;
    async fn delete_measurement(&self, id: i64) -> StorageResult<bool>;

    // Goals
    async fn create_goal(&self, goal: NewGoal) -> StorageResult<Goal>;
    async fn get_goal(&self, id: i64) -> StorageResult<Option<Goal>>;
    /// By target date (missing dates last), then newest first.
    async fn list_goals(&self, client_id: i64) -> StorageResult<Vec<Goal>>;
    async fn update_goal(&self, id: i64, patch: &UpdateGoalRequest)
        -> StorageResult<Option<Goal>>;
    async fn delete_goal(&self, id: i64) -> StorageResult<bool>;

    // Activity log
    async fn find_activity_log(
        &self,
        client_id: i64,
        original_item_id: &str,
        item_type: ItemType,
    ) -> StorageResult<Option<ActivityLogEntry>>;
    /// Fails with `StorageError::Conflict` if the occurrence is already logged.
    async fn insert_activity_log(&self, entry: NewActivityLog) -> StorageResult<ActivityLogEntry>;
    async fn update_activity_log(
        &self,
        id: i64,
        update: &ActivityLogUpdate,
    ) -> StorageResult<Option<ActivityLogEntry>>;
    /// Ordered by scheduled date, optionally bounded (inclusive).
    async fn list_activity_logs(
        &self,
        client_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> StorageResult<Vec<ActivityLogEntry>>;

    /// Cheap liveness probe of the backend.
    async fn ping(&self) -> StorageResult<()>;
}
