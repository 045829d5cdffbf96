//! Shared utilities for the Trainer Hub backend.
//!
//! This crate provides functionality used across all other crates:
//! - Session token signing and verification (HS256 JWT)
//! - Password hashing with Argon2id
//! - Reusable field validators

pub mod jwt;
pub mod password;
pub mod validation;
