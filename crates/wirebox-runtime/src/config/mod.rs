//! Container configuration
//!
//! Typed configuration sections plus a Figment-based loader that merges
//! defaults, an optional TOML file and `WIREBOX__*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{ContainerConfig, DebuggingConfig, LoggingConfig, RegistrationConfig};
