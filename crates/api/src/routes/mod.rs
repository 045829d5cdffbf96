//! HTTP route handlers.

pub mod activity_log;
pub mod alerts;
pub mod appointments;
pub mod assignments;
pub mod billing;
pub mod calendar;
pub mod clients;
pub mod exercises;
pub mod health;
pub mod plan_templates;
pub mod plans;
pub mod tracking;
pub mod users;
