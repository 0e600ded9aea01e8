//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the team-mmr rating service
//! using Prometheus metrics.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the rating service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Rating and balancing metrics
    rating_metrics: RatingMetrics,

    /// Performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Requests handled by operation and outcome
    pub requests_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Rating-related metrics
#[derive(Clone)]
pub struct RatingMetrics {
    /// Matches whose ratings were updated
    pub matches_rated_total: IntCounter,

    /// Rejected requests by validation failure
    pub validation_errors_total: IntCounterVec,

    /// Rating engine failures
    pub internal_errors_total: IntCounter,

    /// Matches per submitted batch
    pub batch_size: Histogram,

    /// Distance from an even match of the chosen team split
    pub balance_distance: Histogram,

    /// Players held by the rating store
    pub stored_players: IntGauge,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Duration of each exposed operation
    pub operation_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let rating_metrics = RatingMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            rating_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get rating metrics
    pub fn rating(&self) -> &RatingMetrics {
        &self.rating_metrics
    }

    /// Get performance metrics
    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record an exposed operation finishing
    pub fn record_request(&self, operation: &str, success: bool, duration: Duration) {
        let status = if success { "success" } else { "error" };

        self.service_metrics
            .requests_total
            .with_label_values(&[operation, status])
            .inc();

        self.performance_metrics
            .operation_duration
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Record matches whose ratings were updated
    pub fn record_matches_rated(&self, count: usize) {
        self.rating_metrics
            .matches_rated_total
            .inc_by(count as u64);
    }

    /// Record the size of a submitted batch
    pub fn record_batch_size(&self, size: usize) {
        self.rating_metrics.batch_size.observe(size as f64);
    }

    /// Record a rejected request
    pub fn record_validation_error(&self, kind: &str) {
        self.rating_metrics
            .validation_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Record a rating engine failure
    pub fn record_internal_error(&self) {
        self.rating_metrics.internal_errors_total.inc();
    }

    /// Record the balance of a generated team split
    pub fn record_balance(&self, distance: f64) {
        self.rating_metrics.balance_distance.observe(distance);
    }

    /// Update the stored player gauge
    pub fn set_stored_players(&self, count: usize) {
        self.rating_metrics.stored_players.set(count as i64);
    }

    /// Update service uptime
    pub fn update_uptime(&self, uptime: Duration) {
        self.service_metrics
            .uptime_seconds
            .set(uptime.as_secs() as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds = IntGauge::new("team_mmr_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let requests_total = IntCounterVec::new(
            Opts::new("team_mmr_requests_total", "Total requests handled"),
            &["operation", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let health_status = IntGauge::new(
            "team_mmr_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("team_mmr_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            uptime_seconds,
            requests_total,
            health_status,
            component_health,
        })
    }
}

impl RatingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_rated_total = IntCounter::new(
            "team_mmr_matches_rated_total",
            "Total matches whose ratings were updated",
        )?;
        registry.register(Box::new(matches_rated_total.clone()))?;

        let validation_errors_total = IntCounterVec::new(
            Opts::new(
                "team_mmr_validation_errors_total",
                "Total requests rejected by validation",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(validation_errors_total.clone()))?;

        let internal_errors_total = IntCounter::new(
            "team_mmr_internal_errors_total",
            "Total rating engine failures",
        )?;
        registry.register(Box::new(internal_errors_total.clone()))?;

        let batch_size = Histogram::with_opts(
            HistogramOpts::new("team_mmr_batch_size", "Matches per submitted batch")
                .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        )?;
        registry.register(Box::new(batch_size.clone()))?;

        let balance_distance = Histogram::with_opts(
            HistogramOpts::new(
                "team_mmr_balance_distance",
                "Distance from 50% win probability of generated teams",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.2, 0.3, 0.5]),
        )?;
        registry.register(Box::new(balance_distance.clone()))?;

        let stored_players =
            IntGauge::new("team_mmr_stored_players", "Players held by the rating store")?;
        registry.register(Box::new(stored_players.clone()))?;

        Ok(Self {
            matches_rated_total,
            validation_errors_total,
            internal_errors_total,
            batch_size,
            balance_distance,
            stored_players,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "team_mmr_operation_duration_seconds",
                "Duration of rating and balancing operations",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        Ok(Self { operation_duration })
    }
}
