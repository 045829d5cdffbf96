//! Domain services for Trainer Hub.
//!
//! Services are free functions over a [`Storage`](crate::storage::Storage)
//! and the caller's [`Session`](crate::session::Session). They enforce
//! ownership and the semantic rules that request validation cannot express.

pub mod access;
pub mod activity_log;
pub mod alerts;
pub mod appointments;
pub mod assignments;
pub mod billing;
pub mod calendar;
pub mod clients;
pub mod compensation;
pub mod exercises;
pub mod plan_builder;
pub mod plan_templates;
pub mod plans;
pub mod tracking;
pub mod users;

pub use calendar::{client_calendar, merge_events};
pub use compensation::{create_with_children, ParentWithChildren};
pub use plan_builder::{flatten_items, goal_progress, prepare_items, structure_items};
