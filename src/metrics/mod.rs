//! Metrics and monitoring for the ladder service
//!
//! Prometheus collectors for ladder activity and service health, plus the
//! HTTP endpoints that expose them.

pub mod collector;
pub mod health;

pub use collector::{LadderMetrics, MetricsCollector, MetricsTimer, ServiceMetrics};
pub use health::{encode_metrics, health_router};
