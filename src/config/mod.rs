//! Configuration management for the team-mmr service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for the rating service.

pub mod app;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, DisplaySettings, RatingSettings, ServiceSettings,
    StorageSettings,
};
