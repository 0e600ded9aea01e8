//! Service layer for the team-mmr rating service
//!
//! This module contains the rating operations, the main application state
//! and the health checks used by the HTTP server and the binary.

pub mod app;
pub mod health;
pub mod mmr;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use mmr::MmrService;
