//! Custom Axum extractors.
//!
//! Extractors for authenticating callers and parsing and validating request data.

pub mod session;
pub mod validated;

pub use session::SessionAuth;
pub use validated::{QueryParams, ValidatedJson};
