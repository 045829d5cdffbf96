//! Domain models for Trainer Hub.

pub mod activity_log;
pub mod alert;
pub mod appointment;
pub mod branding;
pub mod calendar;
pub mod client;
pub mod day;
pub mod exercise;
pub mod fitness_plan;
pub mod measurement;
pub mod nutrition_plan;
pub mod payment;
pub mod plan;
pub mod plan_template;
pub mod user;

pub use activity_log::{ActivityLogEntry, ActivityStatus, ItemType};
pub use alert::Alert;
pub use appointment::{Appointment, AppointmentStatus};
pub use branding::{Branding, MessageTone};
pub use calendar::{CalendarEvent, DateRange};
pub use client::Client;
pub use day::{DayKey, DayOfWeek};
pub use exercise::ExerciseTemplate;
pub use fitness_plan::{FitnessPlan, FitnessPlanItem};
pub use measurement::{Goal, GoalStatus, Measurement};
pub use nutrition_plan::{NutritionPlan, NutritionPlanItem};
pub use payment::{Payment, ProgressEntry};
pub use plan::{ClientPlan, Plan, PlanType};
pub use plan_template::{PlanTemplate, PlanTemplateItem};
pub use user::User;
