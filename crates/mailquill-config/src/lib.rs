//! # mailquill Config
//!
//! TOML configuration for the mailquill binary: generation backend, opener
//! wait policy, logging and extra editor probes.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
