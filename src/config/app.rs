//! Main application configuration
//!
//! This module defines the primary configuration structures for the team-mmr
//! service, including environment variable and file loading and validation.

use crate::matching::validator::MATCH_PLAYERS;
use crate::rating::{DisplayConverter, ExtendedWengLinConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::WengLinConfig;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingSettings,
    pub display: DisplaySettings,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and health reports
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Address the HTTP server binds to
    pub http_host: String,
    /// Port for the API, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Skill model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Mean given to players without history
    pub initial_mu: f64,
    /// Uncertainty given to players without history
    pub initial_sigma: f64,
    /// Skill-class width of the Weng-Lin model
    pub beta: f64,
    /// Lower bound applied to uncertainty updates
    pub uncertainty_tolerance: f64,
}

/// Public display value settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Standard deviations subtracted from mu
    pub sigma_multiplier: f64,
    /// Factor applied before rounding
    pub scale: f64,
}

/// Rating store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Maximum number of players kept by the in-memory store
    pub max_entries: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "team-mmr".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        let defaults = ExtendedWengLinConfig::default();
        Self {
            initial_mu: defaults.initial_mu,
            initial_sigma: defaults.initial_sigma,
            beta: defaults.weng_lin_config.beta,
            uncertainty_tolerance: defaults.weng_lin_config.uncertainty_tolerance,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let defaults = DisplayConverter::default();
        Self {
            sigma_multiplier: defaults.sigma_multiplier,
            scale: defaults.scale,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { max_entries: 10000 }
    }
}

/// Parse an environment variable into `target` if it is set
fn override_from_env<T: FromStr>(key: &str, target: &mut T) -> Result<()> {
    if let Ok(value) = env::var(key) {
        *target = value
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value))?;
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML; missing keys take their defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid TOML configuration")
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        override_from_env("SERVICE_NAME", &mut self.service.name)?;
        override_from_env("LOG_LEVEL", &mut self.service.log_level)?;
        override_from_env("HTTP_HOST", &mut self.service.http_host)?;
        override_from_env("HTTP_PORT", &mut self.service.http_port)?;
        override_from_env(
            "SHUTDOWN_TIMEOUT_SECONDS",
            &mut self.service.shutdown_timeout_seconds,
        )?;

        // Rating settings
        override_from_env("RATING_INITIAL_MU", &mut self.rating.initial_mu)?;
        override_from_env("RATING_INITIAL_SIGMA", &mut self.rating.initial_sigma)?;
        override_from_env("RATING_BETA", &mut self.rating.beta)?;
        override_from_env(
            "RATING_UNCERTAINTY_TOLERANCE",
            &mut self.rating.uncertainty_tolerance,
        )?;

        // Display settings
        override_from_env(
            "DISPLAY_SIGMA_MULTIPLIER",
            &mut self.display.sigma_multiplier,
        )?;
        override_from_env("DISPLAY_SCALE", &mut self.display.scale)?;

        // Storage settings
        override_from_env("STORAGE_MAX_ENTRIES", &mut self.storage.max_entries)?;

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Weng-Lin engine configuration
    pub fn weng_lin_config(&self) -> ExtendedWengLinConfig {
        ExtendedWengLinConfig {
            weng_lin_config: WengLinConfig {
                beta: self.rating.beta,
                uncertainty_tolerance: self.rating.uncertainty_tolerance,
            },
            initial_mu: self.rating.initial_mu,
            initial_sigma: self.rating.initial_sigma,
        }
    }

    /// Display converter configuration
    pub fn display_converter(&self) -> DisplayConverter {
        DisplayConverter {
            sigma_multiplier: self.display.sigma_multiplier,
            scale: self.display.scale,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate rating model and display settings
    config.weng_lin_config().validate()?;
    config.display_converter().validate()?;

    // Validate storage settings
    // A single match must fit in the store
    if config.storage.max_entries < MATCH_PLAYERS {
        return Err(anyhow!(
            "Storage capacity must be at least {} players, got {}",
            MATCH_PLAYERS,
            config.storage.max_entries
        ));
    }

    Ok(())
}
