//! # Chemhover Config
//!
//! TOML configuration for the overlay pipeline: classifier threshold and model
//! location, channel id bound, walker guards, overlay geometry, and where the
//! site filter list is persisted.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
