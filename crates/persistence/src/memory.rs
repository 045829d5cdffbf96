//! In-memory storage.
//!
//! Keeps every table in a `BTreeMap` behind one async `RwLock`. Ids are
//! sequential per table, orderings match the SQL repositories, and deletes
//! cascade the way the foreign keys in the migrations do.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use domain::error::StorageError;
use domain::models::activity_log::{ActivityLogEntry, ActivityLogUpdate, ItemType, NewActivityLog};
use domain::models::alert::{Alert, NewAlert};
use domain::models::appointment::{
    Appointment, AppointmentWithClient, NewAppointment, UpdateAppointmentRequest,
};
use domain::models::branding::{Branding, UpsertBrandingRequest};
use domain::models::client::{Client, NewClient, UpdateClientRequest};
use domain::models::day::DayKey;
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

/// Rows of one table with its id sequence.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id();
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|r| pred(*r)).cloned().collect()
    }

    fn modify(&mut self, id: i64, f: impl FnOnce(&mut T)) -> Option<T> {
        self.rows.get_mut(&id).map(|row| {
            f(row);
            row.clone()
        })
    }

    fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Vec<i64> {
        let ids: Vec<i64> = self
            .rows
            .iter()
            .filter(|(_, r)| pred(*r))
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.rows.remove(id);
        }
        ids
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    clients: Table<Client>,
    plans: Table<Plan>,
    client_plans: Table<ClientPlan>,
    payments: Table<Payment>,
    progress: Table<ProgressEntry>,
    alerts: Table<Alert>,
    branding: Table<Branding>,
    exercises: Table<ExerciseTemplate>,
    plan_templates: Table<PlanTemplate>,
    plan_template_items: Table<PlanTemplateItem>,
    fitness_plans: Table<FitnessPlan>,
    fitness_plan_items: Table<FitnessPlanItem>,
    nutrition_plans: Table<NutritionPlan>,
    nutrition_plan_items: Table<NutritionPlanItem>,
    appointments: Table<Appointment>,
    measurements: Table<Measurement>,
    goals: Table<Goal>,
    activity_logs: Table<ActivityLogEntry>,
}

fn missing(what: &str, id: i64) -> StorageError {
    StorageError::ForeignKey(format!("{} {}", what, id))
}

impl Tables {
    fn require_user(&self, id: i64) -> StorageResult<()> {
        if self.users.contains(id) {
            Ok(())
        } else {
            Err(missing("user", id))
        }
    }

    fn require_client(&self, id: i64) -> StorageResult<()> {
        if self.clients.contains(id) {
            Ok(())
        } else {
            Err(missing("client", id))
        }
    }

    fn require_exercise(&self, id: Option<i64>) -> StorageResult<()> {
        match id {
            Some(id) if !self.exercises.contains(id) => Err(missing("exercise template", id)),
            _ => Ok(()),
        }
    }

    fn delete_fitness_plans(&mut self, pred: impl Fn(&FitnessPlan) -> bool) {
        let ids = self.fitness_plans.remove_where(pred);
        self.fitness_plan_items
            .remove_where(|i| ids.contains(&i.fitness_plan_id));
    }

    fn delete_nutrition_plans(&mut self, pred: impl Fn(&NutritionPlan) -> bool) {
        let ids = self.nutrition_plans.remove_where(pred);
        self.nutrition_plan_items
            .remove_where(|i| ids.contains(&i.nutrition_plan_id));
    }

    fn template_items_sorted(&self, template_id: i64) -> Vec<PlanTemplateItem> {
        let mut items = self
            .plan_template_items
            .filter(|i| i.plan_template_id == template_id);
        items.sort_by_key(|i| (DayKey::from(i.day_of_week), i.exercise_order, i.id));
        items
    }

    fn fitness_items_sorted(&self, plan_id: i64) -> Vec<FitnessPlanItem> {
        let mut items = self
            .fitness_plan_items
            .filter(|i| i.fitness_plan_id == plan_id);
        items.sort_by_key(|i| (DayKey::from(i.day_of_week), i.exercise_order, i.id));
        items
    }

    fn nutrition_items_sorted(&self, plan_id: i64) -> Vec<NutritionPlanItem> {
        let mut items = self
            .nutrition_plan_items
            .filter(|i| i.nutrition_plan_id == plan_id);
        items.sort_by_key(|i| (DayKey::from(i.day_of_week), i.item_order, i.id));
        items
    }

    fn insert_template_items(
        &mut self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        if !self.plan_templates.contains(template_id) {
            return Err(missing("plan template", template_id));
        }
        for item in &items {
            self.require_exercise(item.exercise_template_id)?;
        }
        Ok(items
            .into_iter()
            .map(|item| {
                self.plan_template_items.insert(|id| PlanTemplateItem {
                    id,
                    plan_template_id: template_id,
                    exercise_template_id: item.exercise_template_id,
                    day_of_week: item.day_of_week,
                    exercise_order: item.exercise_order,
                    custom_params: item.custom_params,
                    notes: item.notes,
                })
            })
            .collect())
    }
}

/// Storage held entirely in process memory.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exercise template visible to every trainer.
    pub async fn seed_global_exercise(
        &self,
        name: &str,
        default_params: Option<serde_json::Value>,
    ) -> ExerciseTemplate {
        let mut tables = self.tables.write().await;
        tables.exercises.insert(|id| ExerciseTemplate {
            id,
            trainer_id: None,
            name: name.to_string(),
            exercise_type: None,
            muscle_group: None,
            equipment: None,
            default_params,
            notes: None,
            created_at: Utc::now(),
        })
    }

    /// Seeds the same starter library the postgres migrations install.
    pub async fn seed_starter_library(&self) {
        let starters = [
            ("Back Squat", serde_json::json!({"sets": 4, "reps": 8})),
            ("Bench Press", serde_json::json!({"sets": 4, "reps": 8})),
            ("Deadlift", serde_json::json!({"sets": 3, "reps": 5})),
            ("Pull-up", serde_json::json!({"sets": 3, "reps": 10})),
            ("Plank", serde_json::json!({"sets": 3, "duration_secs": 60})),
            ("Treadmill Run", serde_json::json!({"duration_mins": 20})),
        ];
        for (name, params) in starters {
            self.seed_global_exercise(name, Some(params)).await;
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.rows.values().any(|u| u.username == user.username) {
            return Err(StorageError::Conflict("Username already taken".to_string()));
        }
        if tables.users.rows.values().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict(
                "Email already registered".to_string(),
            ));
        }
        Ok(tables.users.insert(|id| User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            created_at: Utc::now(),
        }))
    }

    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id))
    }

    async fn create_client(&self, client: NewClient) -> StorageResult<Client> {
        let mut tables = self.tables.write().await;
        tables.require_user(client.trainer_id)?;
        let now = Utc::now();
        Ok(tables.clients.insert(|id| Client {
            id,
            trainer_id: client.trainer_id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            avatar_url: client.avatar_url,
            date_of_birth: client.date_of_birth,
            height_cm: client.height_cm,
            weight_kg: client.weight_kg,
            goals: client.goals,
            notes: client.notes,
            is_active: client.is_active,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn get_client(&self, id: i64) -> StorageResult<Option<Client>> {
        Ok(self.tables.read().await.clients.get(id))
    }

    async fn list_clients(&self, trainer_id: i64) -> StorageResult<Vec<Client>> {
        let tables = self.tables.read().await;
        let mut clients = tables.clients.filter(|c| c.trainer_id == trainer_id);
        clients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(clients)
    }

    async fn update_client(
        &self,
        id: i64,
        patch: &UpdateClientRequest,
    ) -> StorageResult<Option<Client>> {
        let mut tables = self.tables.write().await;
        Ok(tables.clients.modify(id, |c| {
            c.apply(patch);
            c.updated_at = Utc::now();
        }))
    }

    async fn delete_client(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.clients.remove(id) {
            return Ok(false);
        }
        tables.client_plans.remove_where(|r| r.client_id == id);
        tables.payments.remove_where(|r| r.client_id == id);
        tables.progress.remove_where(|r| r.client_id == id);
        tables.alerts.remove_where(|r| r.client_id == Some(id));
        tables.delete_fitness_plans(|p| p.client_id == id);
        tables.delete_nutrition_plans(|p| p.client_id == id);
        tables.appointments.remove_where(|r| r.client_id == id);
        tables.measurements.remove_where(|r| r.client_id == id);
        tables.goals.remove_where(|r| r.client_id == id);
        tables.activity_logs.remove_where(|r| r.client_id == id);
        Ok(true)
    }

    async fn create_plan(&self, plan: NewPlan) -> StorageResult<Plan> {
        let mut tables = self.tables.write().await;
        tables.require_user(plan.trainer_id)?;
        Ok(tables.plans.insert(|id| Plan {
            id,
            trainer_id: plan.trainer_id,
            name: plan.name,
            description: plan.description,
            plan_type: plan.plan_type,
            content: plan.content,
            created_at: Utc::now(),
        }))
    }

    async fn get_plan(&self, id: i64) -> StorageResult<Option<Plan>> {
        Ok(self.tables.read().await.plans.get(id))
    }

    async fn list_plans(&self, trainer_id: i64) -> StorageResult<Vec<Plan>> {
        let tables = self.tables.read().await;
        let mut plans = tables.plans.filter(|p| p.trainer_id == trainer_id);
        plans.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(plans)
    }

    async fn update_plan(
        &self,
        id: i64,
        patch: &UpdatePlanRequest,
    ) -> StorageResult<Option<Plan>> {
        Ok(self.tables.write().await.plans.modify(id, |p| p.apply(patch)))
    }

    async fn delete_plan(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.plans.remove(id) {
            return Ok(false);
        }
        tables.client_plans.remove_where(|r| r.plan_id == id);
        Ok(true)
    }

    async fn create_client_plan(
        &self,
        req: &CreateClientPlanRequest,
    ) -> StorageResult<ClientPlan> {
        let mut tables = self.tables.write().await;
        tables.require_client(req.client_id)?;
        if !tables.plans.contains(req.plan_id) {
            return Err(missing("plan", req.plan_id));
        }
        Ok(tables.client_plans.insert(|id| ClientPlan {
            id,
            client_id: req.client_id,
            plan_id: req.plan_id,
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
            notes: req.notes.clone(),
        }))
    }

    async fn get_client_plan(&self, id: i64) -> StorageResult<Option<ClientPlan>> {
        Ok(self.tables.read().await.client_plans.get(id))
    }

    async fn list_client_plans(&self, client_id: i64) -> StorageResult<Vec<ClientPlan>> {
        let tables = self.tables.read().await;
        let mut rows = tables.client_plans.filter(|r| r.client_id == client_id);
        rows.sort_by_key(|r| Reverse((r.start_date, r.id)));
        Ok(rows)
    }

    async fn update_client_plan(
        &self,
        id: i64,
        patch: &UpdateClientPlanRequest,
    ) -> StorageResult<Option<ClientPlan>> {
        Ok(self
            .tables
            .write()
            .await
            .client_plans
            .modify(id, |r| r.apply(patch)))
    }

    async fn delete_client_plan(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.client_plans.remove(id))
    }

    async fn create_payment(&self, payment: NewPayment) -> StorageResult<Payment> {
        let mut tables = self.tables.write().await;
        tables.require_client(payment.client_id)?;
        Ok(tables.payments.insert(|id| Payment {
            id,
            client_id: payment.client_id,
            amount: payment.amount,
            description: payment.description,
            date: payment.date,
            is_paid: payment.is_paid,
        }))
    }

    async fn get_payment(&self, id: i64) -> StorageResult<Option<Payment>> {
        Ok(self.tables.read().await.payments.get(id))
    }

    async fn list_payments_for_client(&self, client_id: i64) -> StorageResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        let mut rows = tables.payments.filter(|r| r.client_id == client_id);
        rows.sort_by_key(|r| Reverse((r.date, r.id)));
        Ok(rows)
    }

    async fn list_payments_for_trainer(&self, trainer_id: i64) -> StorageResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        let mut rows = tables.payments.filter(|r| {
            tables
                .clients
                .rows
                .get(&r.client_id)
                .is_some_and(|c| c.trainer_id == trainer_id)
        });
        rows.sort_by_key(|r| Reverse((r.date, r.id)));
        Ok(rows)
    }

    async fn update_payment(
        &self,
        id: i64,
        patch: &UpdatePaymentRequest,
    ) -> StorageResult<Option<Payment>> {
        Ok(self.tables.write().await.payments.modify(id, |r| r.apply(patch)))
    }

    async fn delete_payment(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.payments.remove(id))
    }

    async fn create_progress(&self, entry: NewProgressEntry) -> StorageResult<ProgressEntry> {
        let mut tables = self.tables.write().await;
        tables.require_client(entry.client_id)?;
        Ok(tables.progress.insert(|id| ProgressEntry {
            id,
            client_id: entry.client_id,
            date: entry.date,
            metrics: entry.metrics,
            notes: entry.notes,
        }))
    }

    async fn get_progress(&self, id: i64) -> StorageResult<Option<ProgressEntry>> {
        Ok(self.tables.read().await.progress.get(id))
    }

    async fn list_progress(&self, client_id: i64) -> StorageResult<Vec<ProgressEntry>> {
        let tables = self.tables.read().await;
        let mut rows = tables.progress.filter(|r| r.client_id == client_id);
        rows.sort_by_key(|r| (r.date, r.id));
        Ok(rows)
    }

    async fn update_progress(
        &self,
        id: i64,
        patch: &UpdateProgressRequest,
    ) -> StorageResult<Option<ProgressEntry>> {
        Ok(self.tables.write().await.progress.modify(id, |r| r.apply(patch)))
    }

    async fn delete_progress(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.progress.remove(id))
    }

    async fn create_alert(&self, alert: NewAlert) -> StorageResult<Alert> {
        let mut tables = self.tables.write().await;
        tables.require_user(alert.trainer_id)?;
        if let Some(client_id) = alert.client_id {
            tables.require_client(client_id)?;
        }
        Ok(tables.alerts.insert(|id| Alert {
            id,
            trainer_id: alert.trainer_id,
            client_id: alert.client_id,
            title: alert.title,
            message: alert.message,
            is_read: false,
            created_at: Utc::now(),
        }))
    }

    async fn get_alert(&self, id: i64) -> StorageResult<Option<Alert>> {
        Ok(self.tables.read().await.alerts.get(id))
    }

    async fn list_alerts(&self, trainer_id: i64, unread_only: bool) -> StorageResult<Vec<Alert>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .alerts
            .filter(|a| a.trainer_id == trainer_id && (!unread_only || !a.is_read));
        rows.sort_by_key(|a| Reverse((a.created_at, a.id)));
        Ok(rows)
    }

    async fn mark_alert_read(&self, id: i64) -> StorageResult<Option<Alert>> {
        Ok(self
            .tables
            .write()
            .await
            .alerts
            .modify(id, |a| a.is_read = true))
    }

    async fn delete_alert(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.alerts.remove(id))
    }

    async fn get_branding(&self, trainer_id: i64) -> StorageResult<Option<Branding>> {
        let tables = self.tables.read().await;
        Ok(tables
            .branding
            .rows
            .values()
            .find(|b| b.trainer_id == trainer_id)
            .cloned())
    }

    async fn upsert_branding(
        &self,
        trainer_id: i64,
        req: &UpsertBrandingRequest,
    ) -> StorageResult<Branding> {
        let mut tables = self.tables.write().await;
        tables.require_user(trainer_id)?;
        let existing = tables
            .branding
            .rows
            .values()
            .find(|b| b.trainer_id == trainer_id)
            .map(|b| b.id);
        let fill = |b: &mut Branding| {
            b.logo_url = req.logo_url.clone();
            b.primary_color = req.primary_color.clone();
            b.secondary_color = req.secondary_color.clone();
            b.message_tone = req.message_tone;
            b.terms_of_service = req.terms_of_service.clone();
            b.updated_at = Utc::now();
        };
        if let Some(branding) = existing.and_then(|id| tables.branding.modify(id, fill)) {
            return Ok(branding);
        }
        Ok(tables.branding.insert(|id| {
            let mut branding = Branding {
                id,
                trainer_id,
                logo_url: None,
                primary_color: None,
                secondary_color: None,
                message_tone: Default::default(),
                terms_of_service: None,
                updated_at: Utc::now(),
            };
            fill(&mut branding);
            branding
        }))
    }

    async fn create_exercise_template(
        &self,
        template: NewExerciseTemplate,
    ) -> StorageResult<ExerciseTemplate> {
        let mut tables = self.tables.write().await;
        tables.require_user(template.trainer_id)?;
        Ok(tables.exercises.insert(|id| ExerciseTemplate {
            id,
            trainer_id: Some(template.trainer_id),
            name: template.name,
            exercise_type: template.exercise_type,
            muscle_group: template.muscle_group,
            equipment: template.equipment,
            default_params: template.default_params,
            notes: template.notes,
            created_at: Utc::now(),
        }))
    }

    async fn get_exercise_template(&self, id: i64) -> StorageResult<Option<ExerciseTemplate>> {
        Ok(self.tables.read().await.exercises.get(id))
    }

    async fn list_exercise_templates(
        &self,
        trainer_id: i64,
    ) -> StorageResult<Vec<ExerciseTemplate>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .exercises
            .filter(|e| e.trainer_id.map_or(true, |t| t == trainer_id));
        rows.sort_by(|a, b| {
            a.is_global()
                .cmp(&b.is_global())
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn update_exercise_template(
        &self,
        id: i64,
        patch: &ExerciseTemplatePatch,
    ) -> StorageResult<Option<ExerciseTemplate>> {
        Ok(self.tables.write().await.exercises.modify(id, |e| e.apply(patch)))
    }

    async fn delete_exercise_template(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.exercises.remove(id) {
            return Ok(false);
        }
        for item in tables.plan_template_items.rows.values_mut() {
            if item.exercise_template_id == Some(id) {
                item.exercise_template_id = None;
            }
        }
        for item in tables.fitness_plan_items.rows.values_mut() {
            if item.exercise_template_id == Some(id) {
                item.exercise_template_id = None;
            }
        }
        Ok(true)
    }

    async fn create_plan_template(
        &self,
        template: NewPlanTemplate,
    ) -> StorageResult<PlanTemplate> {
        let mut tables = self.tables.write().await;
        tables.require_user(template.trainer_id)?;
        let now = Utc::now();
        Ok(tables.plan_templates.insert(|id| PlanTemplate {
            id,
            trainer_id: template.trainer_id,
            name: template.name,
            description: template.description,
            duration_weeks: template.duration_weeks,
            days_per_week: template.days_per_week,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn insert_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        self.tables
            .write()
            .await
            .insert_template_items(template_id, items)
    }

    async fn get_plan_template(&self, id: i64) -> StorageResult<Option<PlanTemplate>> {
        Ok(self.tables.read().await.plan_templates.get(id))
    }

    async fn list_plan_templates(&self, trainer_id: i64) -> StorageResult<Vec<PlanTemplate>> {
        let tables = self.tables.read().await;
        let mut rows = tables.plan_templates.filter(|t| t.trainer_id == trainer_id);
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_plan_template_items(
        &self,
        template_id: i64,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        Ok(self.tables.read().await.template_items_sorted(template_id))
    }

    async fn update_plan_template(
        &self,
        id: i64,
        header: NewPlanTemplate,
    ) -> StorageResult<Option<PlanTemplate>> {
        Ok(self.tables.write().await.plan_templates.modify(id, |t| {
            t.name = header.name;
            t.description = header.description;
            t.duration_weeks = header.duration_weeks;
            t.days_per_week = header.days_per_week;
            t.updated_at = Utc::now();
        }))
    }

    async fn replace_plan_template_items(
        &self,
        template_id: i64,
        items: Vec<NewPlanTemplateItem>,
    ) -> StorageResult<Vec<PlanTemplateItem>> {
        let mut tables = self.tables.write().await;
        // Validate before deleting so a failed replace leaves the old items.
        for item in &items {
            tables.require_exercise(item.exercise_template_id)?;
        }
        tables
            .plan_template_items
            .remove_where(|i| i.plan_template_id == template_id);
        tables.insert_template_items(template_id, items)
    }

    async fn delete_plan_template(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.plan_templates.remove(id) {
            return Ok(false);
        }
        tables
            .plan_template_items
            .remove_where(|i| i.plan_template_id == id);
        for plan in tables.fitness_plans.rows.values_mut() {
            if plan.source_plan_template_id == Some(id) {
                plan.source_plan_template_id = None;
            }
        }
        Ok(true)
    }

    async fn create_fitness_plan(&self, plan: NewFitnessPlan) -> StorageResult<FitnessPlan> {
        let mut tables = self.tables.write().await;
        tables.require_client(plan.client_id)?;
        tables.require_user(plan.trainer_id)?;
        if let Some(template_id) = plan.source_plan_template_id {
            if !tables.plan_templates.contains(template_id) {
                return Err(missing("plan template", template_id));
            }
        }
        Ok(tables.fitness_plans.insert(|id| FitnessPlan {
            id,
            client_id: plan.client_id,
            trainer_id: plan.trainer_id,
            source_plan_template_id: plan.source_plan_template_id,
            name: plan.name,
            description: plan.description,
            start_date: plan.start_date,
            end_date: plan.end_date,
            is_active: plan.is_active,
            created_at: Utc::now(),
        }))
    }

    async fn insert_fitness_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewFitnessPlanItem>,
    ) -> StorageResult<Vec<FitnessPlanItem>> {
        let mut tables = self.tables.write().await;
        if !tables.fitness_plans.contains(plan_id) {
            return Err(missing("fitness plan", plan_id));
        }
        for item in &items {
            tables.require_exercise(item.exercise_template_id)?;
        }
        Ok(items
            .into_iter()
            .map(|item| {
                tables.fitness_plan_items.insert(|id| FitnessPlanItem {
                    id,
                    fitness_plan_id: plan_id,
                    exercise_template_id: item.exercise_template_id,
                    exercise_name: item.exercise_name,
                    day_of_week: item.day_of_week,
                    exercise_order: item.exercise_order,
                    custom_params: item.custom_params,
                    notes: item.notes,
                })
            })
            .collect())
    }

    async fn get_fitness_plan(&self, id: i64) -> StorageResult<Option<FitnessPlan>> {
        Ok(self.tables.read().await.fitness_plans.get(id))
    }

    async fn list_fitness_plans(&self, client_id: i64) -> StorageResult<Vec<FitnessPlan>> {
        let tables = self.tables.read().await;
        let mut rows = tables.fitness_plans.filter(|p| p.client_id == client_id);
        rows.sort_by_key(|p| Reverse((p.start_date, p.id)));
        Ok(rows)
    }

    async fn list_fitness_plan_items(&self, plan_id: i64) -> StorageResult<Vec<FitnessPlanItem>> {
        Ok(self.tables.read().await.fitness_items_sorted(plan_id))
    }

    async fn delete_fitness_plan(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.fitness_plans.contains(id);
        tables.delete_fitness_plans(|p| p.id == id);
        Ok(existed)
    }

    async fn list_active_fitness_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<FitnessPlanDetails>> {
        let tables = self.tables.read().await;
        let mut plans = tables.fitness_plans.filter(|p| {
            p.client_id == client_id && p.is_active && p.overlaps(start, end)
        });
        plans.sort_by_key(|p| (p.start_date, p.id));
        Ok(plans
            .into_iter()
            .map(|plan| FitnessPlanDetails {
                items: tables.fitness_items_sorted(plan.id),
                plan,
            })
            .collect())
    }

    async fn create_nutrition_plan(
        &self,
        plan: NewNutritionPlan,
    ) -> StorageResult<NutritionPlan> {
        let mut tables = self.tables.write().await;
        tables.require_client(plan.client_id)?;
        tables.require_user(plan.trainer_id)?;
        Ok(tables.nutrition_plans.insert(|id| NutritionPlan {
            id,
            client_id: plan.client_id,
            trainer_id: plan.trainer_id,
            name: plan.name,
            description: plan.description,
            start_date: plan.start_date,
            end_date: plan.end_date,
            is_active: plan.is_active,
            created_at: Utc::now(),
        }))
    }

    async fn insert_nutrition_plan_items(
        &self,
        plan_id: i64,
        items: Vec<NewNutritionPlanItem>,
    ) -> StorageResult<Vec<NutritionPlanItem>> {
        let mut tables = self.tables.write().await;
        if !tables.nutrition_plans.contains(plan_id) {
            return Err(missing("nutrition plan", plan_id));
        }
        Ok(items
            .into_iter()
            .map(|item| {
                tables.nutrition_plan_items.insert(|id| NutritionPlanItem {
                    id,
                    nutrition_plan_id: plan_id,
                    day_of_week: item.day_of_week,
                    meal_type: item.meal_type,
                    description: item.description,
                    calories: item.calories,
                    protein_g: item.protein_g,
                    carbs_g: item.carbs_g,
                    fat_g: item.fat_g,
                    item_order: item.item_order,
                })
            })
            .collect())
    }

    async fn get_nutrition_plan(&self, id: i64) -> StorageResult<Option<NutritionPlan>> {
        Ok(self.tables.read().await.nutrition_plans.get(id))
    }

    async fn list_nutrition_plans(&self, client_id: i64) -> StorageResult<Vec<NutritionPlan>> {
        let tables = self.tables.read().await;
        let mut rows = tables.nutrition_plans.filter(|p| p.client_id == client_id);
        rows.sort_by_key(|p| Reverse((p.start_date, p.id)));
        Ok(rows)
    }

    async fn list_nutrition_plan_items(
        &self,
        plan_id: i64,
    ) -> StorageResult<Vec<NutritionPlanItem>> {
        Ok(self.tables.read().await.nutrition_items_sorted(plan_id))
    }

    async fn delete_nutrition_plan(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.nutrition_plans.contains(id);
        tables.delete_nutrition_plans(|p| p.id == id);
        Ok(existed)
    }

    async fn list_active_nutrition_plans(
        &self,
        client_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<NutritionPlanDetails>> {
        let tables = self.tables.read().await;
        let mut plans = tables.nutrition_plans.filter(|p| {
            p.client_id == client_id && p.is_active && p.overlaps(start, end)
        });
        plans.sort_by_key(|p| (p.start_date, p.id));
        Ok(plans
            .into_iter()
            .map(|plan| NutritionPlanDetails {
                items: tables.nutrition_items_sorted(plan.id),
                plan,
            })
            .collect())
    }

    async fn create_appointment(&self, appt: NewAppointment) -> StorageResult<Appointment> {
        let mut tables = self.tables.write().await;
        tables.require_client(appt.client_id)?;
        tables.require_user(appt.trainer_id)?;
        Ok(tables.appointments.insert(|id| Appointment {
            id,
            trainer_id: appt.trainer_id,
            client_id: appt.client_id,
            title: appt.title,
            description: appt.description,
            appointment_type: appt.appointment_type,
            start_time: appt.start_time,
            end_time: appt.end_time,
            status: appt.status,
            created_at: Utc::now(),
        }))
    }

    async fn get_appointment(&self, id: i64) -> StorageResult<Option<Appointment>> {
        Ok(self.tables.read().await.appointments.get(id))
    }

    async fn list_appointments_for_trainer(
        &self,
        trainer_id: i64,
    ) -> StorageResult<Vec<AppointmentWithClient>> {
        let tables = self.tables.read().await;
        let mut rows = tables.appointments.filter(|a| a.trainer_id == trainer_id);
        rows.sort_by_key(|a| (a.start_time, a.id));
        Ok(rows
            .into_iter()
            .filter_map(|appointment| {
                let client_name = tables.clients.rows.get(&appointment.client_id)?.name.clone();
                Some(AppointmentWithClient {
                    appointment,
                    client_name,
                })
            })
            .collect())
    }

    async fn list_appointments_for_client(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StorageResult<Vec<Appointment>> {
        let tables = self.tables.read().await;
        let mut rows = tables.appointments.filter(|a| {
            a.client_id == client_id && a.start_time < until && a.end_time > from
        });
        rows.sort_by_key(|a| (a.start_time, a.id));
        Ok(rows)
    }

    async fn update_appointment(
        &self,
        id: i64,
        patch: &UpdateAppointmentRequest,
    ) -> StorageResult<Option<Appointment>> {
        Ok(self
            .tables
            .write()
            .await
            .appointments
            .modify(id, |a| a.apply(patch)))
    }

    async fn delete_appointment(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.appointments.remove(id))
    }

    async fn create_measurement(&self, m: NewMeasurement) -> StorageResult<Measurement> {
        let mut tables = self.tables.write().await;
        tables.require_client(m.client_id)?;
        Ok(tables.measurements.insert(|id| Measurement {
            id,
            client_id: m.client_id,
            measurement_date: m.measurement_date,
            weight_kg: m.weight_kg,
            body_fat_percentage: m.body_fat_percentage,
            waist_cm: m.waist_cm,
            chest_cm: m.chest_cm,
            hips_cm: m.hips_cm,
            notes: m.notes,
            created_at: Utc::now(),
        }))
    }

    async fn get_measurement(&self, id: i64) -> StorageResult<Option<Measurement>> {
        Ok(self.tables.read().await.measurements.get(id))
    }

    async fn list_measurements(&self, client_id: i64) -> StorageResult<Vec<Measurement>> {
        let tables = self.tables.read().await;
        let mut rows = tables.measurements.filter(|m| m.client_id == client_id);
        rows.sort_by_key(|m| (m.measurement_date, m.id));
        Ok(rows)
    }

    async fn delete_measurement(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.measurements.remove(id))
    }

    async fn create_goal(&self, goal: NewGoal) -> StorageResult<Goal> {
        let mut tables = self.tables.write().await;
        tables.require_client(goal.client_id)?;
        let now = Utc::now();
        Ok(tables.goals.insert(|id| Goal {
            id,
            client_id: goal.client_id,
            goal_description: goal.goal_description,
            target_value: goal.target_value,
            current_value: goal.current_value,
            unit: goal.unit,
            target_date: goal.target_date,
            status: goal.status,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn get_goal(&self, id: i64) -> StorageResult<Option<Goal>> {
        Ok(self.tables.read().await.goals.get(id))
    }

    async fn list_goals(&self, client_id: i64) -> StorageResult<Vec<Goal>> {
        let tables = self.tables.read().await;
        let mut rows = tables.goals.filter(|g| g.client_id == client_id);
        // Dated goals first, soonest first; undated ones after.
        rows.sort_by_key(|g| {
            (
                g.target_date.is_none(),
                g.target_date,
                Reverse((g.created_at, g.id)),
            )
        });
        Ok(rows)
    }

    async fn update_goal(
        &self,
        id: i64,
        patch: &UpdateGoalRequest,
    ) -> StorageResult<Option<Goal>> {
        Ok(self.tables.write().await.goals.modify(id, |g| {
            g.apply(patch);
            g.updated_at = Utc::now();
        }))
    }

    async fn delete_goal(&self, id: i64) -> StorageResult<bool> {
        Ok(self.tables.write().await.goals.remove(id))
    }

    async fn find_activity_log(
        &self,
        client_id: i64,
        original_item_id: &str,
        item_type: ItemType,
    ) -> StorageResult<Option<ActivityLogEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .activity_logs
            .rows
            .values()
            .find(|e| {
                e.client_id == client_id
                    && e.original_item_id == original_item_id
                    && e.item_type == item_type
            })
            .cloned())
    }

    async fn insert_activity_log(&self, entry: NewActivityLog) -> StorageResult<ActivityLogEntry> {
        let mut tables = self.tables.write().await;
        tables.require_client(entry.client_id)?;
        let duplicate = tables.activity_logs.rows.values().any(|e| {
            e.client_id == entry.client_id
                && e.original_item_id == entry.original_item_id
                && e.item_type == entry.item_type
        });
        if duplicate {
            return Err(StorageError::Conflict("Activity already logged".to_string()));
        }
        let now = Utc::now();
        Ok(tables.activity_logs.insert(|id| ActivityLogEntry {
            id,
            client_id: entry.client_id,
            original_item_id: entry.original_item_id,
            item_type: entry.item_type,
            title: entry.title,
            scheduled_date: entry.scheduled_date,
            status: entry.status,
            client_notes: entry.client_notes,
            completion_details: entry.completion_details,
            performed_at: entry.performed_at,
            source_item_table: entry.source_item_table,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_activity_log(
        &self,
        id: i64,
        update: &ActivityLogUpdate,
    ) -> StorageResult<Option<ActivityLogEntry>> {
        Ok(self
            .tables
            .write()
            .await
            .activity_logs
            .modify(id, |e| e.apply(update)))
    }

    async fn list_activity_logs(
        &self,
        client_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> StorageResult<Vec<ActivityLogEntry>> {
        let tables = self.tables.read().await;
        let mut rows = tables.activity_logs.filter(|e| {
            e.client_id == client_id
                && start.map_or(true, |s| e.scheduled_date >= s)
                && end.map_or(true, |d| e.scheduled_date <= d)
        });
        rows.sort_by_key(|e| (e.scheduled_date, e.id));
        Ok(rows)
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
