//! Persistence layer for Trainer Hub.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The two storage backends: [`MemoryStorage`] and [`PgStorage`]

pub mod db;
pub mod entities;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod pg_storage;
pub mod repositories;

pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
