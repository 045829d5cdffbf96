//! Domain layer for the Trainer Hub backend.
//!
//! This crate contains:
//! - Domain models with request/response records and their validation rules
//! - The session context passed to every service call
//! - The `Storage` port implemented by the persistence crate
//! - Business services (calendar aggregation, activity logging, plan building)

pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{DomainError, FieldError, StorageError};
pub use session::Session;
pub use storage::Storage;
