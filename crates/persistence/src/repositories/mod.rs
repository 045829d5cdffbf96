//! Repository implementations for database operations.

pub mod activity_log;
pub mod alert;
pub mod appointment;
pub mod client;
pub mod exercise_template;
pub mod fitness_plan;
pub mod measurement;
pub mod nutrition_plan;
pub mod payment;
pub mod plan;
pub mod plan_template;
pub mod user;

pub use activity_log::ActivityLogRepository;
pub use alert::{AlertRepository, BrandingRepository};
pub use appointment::AppointmentRepository;
pub use client::ClientRepository;
pub use exercise_template::ExerciseTemplateRepository;
pub use fitness_plan::FitnessPlanRepository;
pub use measurement::{GoalRepository, MeasurementRepository};
pub use nutrition_plan::NutritionPlanRepository;
pub use payment::{PaymentRepository, ProgressRepository};
pub use plan::{ClientPlanRepository, PlanRepository};
pub use plan_template::PlanTemplateRepository;
pub use user::UserRepository;
