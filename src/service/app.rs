//! Main application state and service coordination
//!
//! This module contains the AppState that wires the rating engine, the
//! rating store and metrics into an [`MmrService`], and owns the store
//! lifecycle.

use crate::config::AppConfig;
use crate::metrics::MetricsCollector;
use crate::rating::engine::RatingEngine;
use crate::rating::storage::{InMemoryRatingStore, RatingStore};
use crate::rating::weng_lin::WengLinRatingEngine;
use crate::service::mmr::MmrService;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Rating store error: {message}")]
    Storage { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Rating operations exposed over HTTP
    mmr_service: Arc<MmrService>,

    /// Metrics shared with the HTTP server
    metrics: Arc<MetricsCollector>,

    started_at: Instant,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with the Weng-Lin engine and in-memory store
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing {} rating service", config.service.name);

        let engine = WengLinRatingEngine::new(config.weng_lin_config()).map_err(|e| {
            ServiceError::Configuration {
                message: format!("Failed to initialize rating engine: {}", e),
            }
        })?;
        let store = Arc::new(InMemoryRatingStore::new(config.storage.max_entries));

        Self::with_components(config, Arc::new(engine), store)
    }

    /// Initialize the application around caller-provided collaborators
    pub fn with_components(
        config: AppConfig,
        engine: Arc<dyn RatingEngine>,
        store: Arc<dyn RatingStore>,
    ) -> Result<Self, ServiceError> {
        let metrics =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let mmr_service = Arc::new(MmrService::new(
            engine,
            config.display_converter(),
            store,
            metrics.clone(),
        ));

        Ok(Self {
            config,
            mmr_service,
            metrics,
            started_at: Instant::now(),
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Open the rating store and start accepting requests
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Starting {} rating service", self.config.service.name);

        let store = self.mmr_service.store();
        store.open().await.map_err(|e| ServiceError::Storage {
            message: format!("Failed to open rating store: {}", e),
        })?;

        if let Ok(count) = store.player_count().await {
            self.metrics.set_stored_players(count);
        }

        *self.is_running.write().await = true;
        self.metrics.update_health_status(2);

        info!("✅ {} rating service started", self.config.service.name);
        Ok(())
    }

    /// Stop accepting requests and close the rating store
    pub async fn stop(&self) -> Result<(), ServiceError> {
        info!("Stopping {} rating service", self.config.service.name);

        *self.is_running.write().await = false;
        self.metrics.update_health_status(0);

        let store = self.mmr_service.store();
        match store.player_count().await {
            Ok(count) => info!("Final rating store size: {} players", count),
            Err(e) => warn!("Could not read final rating store size: {}", e),
        }

        store.close().await.map_err(|e| ServiceError::Storage {
            message: format!("Failed to close rating store: {}", e),
        })?;

        info!("✅ {} rating service stopped", self.config.service.name);
        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn mmr_service(&self) -> Arc<MmrService> {
        self.mmr_service.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
