use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use domain::Storage;
use shared::jwt::{JwtError, SessionKeys};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{
    activity_log, alerts, appointments, assignments, billing, calendar, clients, exercises,
    health, plan_templates, plans, tracking, users,
};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub keys: Arc<SessionKeys>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Result<Self, JwtError> {
        let keys = SessionKeys::from_secret(&config.auth.session_secret, config.auth.leeway_secs)?;
        Ok(Self {
            storage,
            keys: Arc::new(keys),
            config: Arc::new(config),
        })
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Routes a trainer session works with.
fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/:id", get(users::get_user))
        // Clients
        .route(
            "/api/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/clients/:id",
            get(clients::get_client)
                .patch(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/api/clients/:id/archive", post(clients::archive_client))
        .route("/api/clients/:id/calendar", get(calendar::client_calendar))
        .route(
            "/api/clients/:id/activity-log",
            get(activity_log::list_client_activity_logs),
        )
        // Measurements and goals
        .route(
            "/api/clients/:id/measurements",
            get(tracking::list_measurements).post(tracking::create_measurement),
        )
        .route(
            "/api/clients/:id/measurements/series",
            get(tracking::measurement_series),
        )
        .route(
            "/api/measurements/:id",
            delete(tracking::delete_measurement),
        )
        .route(
            "/api/clients/:id/goals",
            get(tracking::list_goals).post(tracking::create_goal),
        )
        .route(
            "/api/goals/:id",
            patch(tracking::update_goal).delete(tracking::delete_goal),
        )
        // Fitness and nutrition plans
        .route(
            "/api/clients/:id/fitness-plans",
            get(assignments::list_fitness_plans),
        )
        .route("/api/fitness-plans", post(assignments::assign_fitness_plan))
        .route(
            "/api/fitness-plans/:id",
            get(assignments::get_fitness_plan).delete(assignments::delete_fitness_plan),
        )
        .route(
            "/api/clients/:id/nutrition-plans",
            get(assignments::list_nutrition_plans),
        )
        .route(
            "/api/nutrition-plans",
            post(assignments::create_nutrition_plan),
        )
        .route(
            "/api/nutrition-plans/:id",
            get(assignments::get_nutrition_plan).delete(assignments::delete_nutrition_plan),
        )
        // Free-form plans
        .route("/api/plans", get(plans::list_plans).post(plans::create_plan))
        .route(
            "/api/plans/:id",
            get(plans::get_plan)
                .patch(plans::update_plan)
                .delete(plans::delete_plan),
        )
        .route(
            "/api/client-plans",
            get(plans::list_client_plans).post(plans::assign_plan),
        )
        .route(
            "/api/client-plans/:id",
            patch(plans::update_client_plan).delete(plans::delete_client_plan),
        )
        // Billing
        .route(
            "/api/payments",
            get(billing::list_payments).post(billing::create_payment),
        )
        .route(
            "/api/payments/:id",
            patch(billing::update_payment).delete(billing::delete_payment),
        )
        .route(
            "/api/progress",
            get(billing::list_progress).post(billing::create_progress),
        )
        .route(
            "/api/progress/:id",
            patch(billing::update_progress).delete(billing::delete_progress),
        )
        // Alerts and branding
        .route(
            "/api/alerts",
            get(alerts::list_alerts).post(alerts::create_alert),
        )
        .route("/api/alerts/:id/read", post(alerts::mark_alert_read))
        .route(
            "/api/alerts/:id",
            delete(alerts::delete_alert),
        )
        .route(
            "/api/branding",
            get(alerts::get_branding).post(alerts::upsert_branding),
        )
        .route(
            "/api/branding/:trainer_id",
            get(alerts::get_trainer_branding),
        )
        // Exercise library and templates
        .route(
            "/api/exercise-templates",
            get(exercises::list_exercise_templates).post(exercises::create_exercise_template),
        )
        .route(
            "/api/exercise-templates/:id",
            get(exercises::get_exercise_template)
                .patch(exercises::update_exercise_template)
                .delete(exercises::delete_exercise_template),
        )
        .route(
            "/api/plan-templates",
            get(plan_templates::list_plan_templates).post(plan_templates::create_plan_template),
        )
        .route(
            "/api/plan-templates/:id",
            get(plan_templates::get_plan_template)
                .put(plan_templates::update_plan_template)
                .delete(plan_templates::delete_plan_template),
        )
        .route(
            "/api/plan-templates/:id/builder",
            get(plan_templates::plan_builder),
        )
        // Appointments
        .route(
            "/api/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            patch(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
}

/// Routes a client session works with.
fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/api/me/calendar", get(calendar::my_calendar))
        .route(
            "/api/me/activity-log",
            get(activity_log::find_activity_log).put(activity_log::upsert_activity_log),
        )
        .route("/api/me/measurements", get(tracking::my_measurements))
        .route("/api/me/goals", get(tracking::my_goals))
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/users", post(users::create_user))
        .route("/metrics", get(metrics_handler));

    // Session checks happen per handler through the SessionAuth extractor
    Router::new()
        .merge(public_routes)
        .merge(trainer_routes())
        .merge(client_routes())
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
