//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Enum columns are stored as
//! text and parsed on conversion to domain models.

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

pub use activity_log::ActivityLogEntity;
pub use alert::{AlertEntity, BrandingEntity};
pub use appointment::{AppointmentEntity, AppointmentWithClientEntity};
pub use client::ClientEntity;
pub use exercise_template::ExerciseTemplateEntity;
pub use fitness_plan::{FitnessPlanEntity, FitnessPlanItemEntity};
pub use measurement::{GoalEntity, MeasurementEntity};
pub use nutrition_plan::{NutritionPlanEntity, NutritionPlanItemEntity};
pub use payment::{PaymentEntity, ProgressEntryEntity};
pub use plan::{ClientPlanEntity, PlanEntity};
pub use plan_template::{PlanTemplateEntity, PlanTemplateItemEntity};
pub use user::UserEntity;
