//! HTTP surface of the team-mmr service
//!
//! JSON routes for the rating operations plus health, readiness and
//! Prometheus endpoints, served with Axum.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, ApiServer, ApiServerConfig};
