//! Configuration loading and validation.

mod settings;

pub use settings::{AiConfig, AppConfig, ConfigError};
