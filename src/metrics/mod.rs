//! Metrics for the team-mmr rating service
//!
//! This module provides Prometheus metrics collection for rating requests,
//! team balancing and the rating store. The metrics are served by the HTTP
//! server in [`crate::api`].

pub mod collector;

pub use collector::{
    MetricsCollector, MetricsTimer, PerformanceMetrics, RatingMetrics, ServiceMetrics,
};
