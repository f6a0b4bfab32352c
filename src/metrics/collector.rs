//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the ladder service using
//! Prometheus metrics.

use crate::types::Outcome;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the ladder service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Ladder metrics (players and matches)
    ladder_metrics: LadderMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// HTTP requests by route and status class
    pub http_requests_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Ladder metrics
#[derive(Clone)]
pub struct LadderMetrics {
    /// Players currently on the ladder
    pub players: IntGauge,

    /// Total players created
    pub players_created_total: IntCounter,

    /// Match resolutions by result status
    pub matches_total: IntCounterVec,

    /// Size of each applied rating delta
    pub rating_delta: Histogram,

    /// Ratings written after each match, by outcome
    pub rating_distribution: HistogramVec,

    /// Time spent resolving a match, lock wait included
    pub match_resolution_duration: Histogram,
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
        let ladder_metrics = LadderMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            ladder_metrics,
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

    /// Get ladder metrics
    pub fn ladder(&self) -> &LadderMetrics {
        &self.ladder_metrics
    }

    /// Record a player being created
    pub fn record_player_created(&self) {
        self.ladder_metrics.players_created_total.inc();
        self.ladder_metrics.players.inc();
    }

    /// Set the current player count
    pub fn set_player_count(&self, count: usize) {
        self.ladder_metrics.players.set(count as i64);
    }

    /// Record a successfully resolved match
    pub fn record_match_resolved(
        &self,
        delta: f64,
        winner_rating: f64,
        loser_rating: f64,
        duration: Duration,
    ) {
        self.ladder_metrics
            .matches_total
            .with_label_values(&["resolved"])
            .inc();
        self.ladder_metrics.rating_delta.observe(delta);
        self.ladder_metrics
            .rating_distribution
            .with_label_values(&[outcome_label(Outcome::Win)])
            .observe(winner_rating);
        self.ladder_metrics
            .rating_distribution
            .with_label_values(&[outcome_label(Outcome::Loss)])
            .observe(loser_rating);
        self.ladder_metrics
            .match_resolution_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a match that was rejected or failed; `status` names the error kind
    pub fn record_match_failed(&self, status: &str) {
        self.ladder_metrics
            .matches_total
            .with_label_values(&[status])
            .inc();
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, route: &str, status: u16) {
        let class = match status {
            200..=299 => "2xx",
            400..=499 => "4xx",
            500..=599 => "5xx",
            _ => "other",
        };
        self.service_metrics
            .http_requests_total
            .with_label_values(&[route, class])
            .inc();
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

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "win",
        Outcome::Loss => "loss",
    }
}

/// Timer for measuring operation durations
#[derive(Debug)]
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn new() -> Self {
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
        let uptime_seconds = IntGauge::new("ladder_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("ladder_http_requests_total", "Total HTTP requests handled"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let health_status = IntGauge::new(
            "ladder_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("ladder_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            uptime_seconds,
            http_requests_total,
            health_status,
            component_health,
        })
    }
}

impl LadderMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let players = IntGauge::new("ladder_players", "Players currently on the ladder")?;
        registry.register(Box::new(players.clone()))?;

        let players_created_total =
            IntCounter::new("ladder_players_created_total", "Total players created")?;
        registry.register(Box::new(players_created_total.clone()))?;

        let matches_total = IntCounterVec::new(
            Opts::new("ladder_matches_total", "Match resolutions by status"),
            &["status"],
        )?;
        registry.register(Box::new(matches_total.clone()))?;

        let rating_delta = Histogram::with_opts(
            HistogramOpts::new("ladder_rating_delta", "Rating delta applied per match")
                .buckets(vec![2.0, 4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 28.0, 32.0]),
        )?;
        registry.register(Box::new(rating_delta.clone()))?;

        let rating_distribution = HistogramVec::new(
            HistogramOpts::new(
                "ladder_rating_distribution",
                "Ratings written after matches",
            )
            .buckets(vec![
                600.0, 800.0, 900.0, 1000.0, 1100.0, 1200.0, 1400.0, 1600.0,
            ]),
            &["outcome"],
        )?;
        registry.register(Box::new(rating_distribution.clone()))?;

        let match_resolution_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ladder_match_resolution_duration_seconds",
                "Match resolution time",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(match_resolution_duration.clone()))?;

        Ok(Self {
            players,
            players_created_total,
            matches_total,
            rating_delta,
            rating_distribution,
            match_resolution_duration,
        })
    }
}
