//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the player store,
//! rating engine, ladder service and metrics together, and owns the HTTP
//! server and background task lifecycle.

use crate::api::server::HttpServer;
use crate::config::AppConfig;
use crate::ladder::LadderService;
use crate::metrics::MetricsCollector;
use crate::rating::{EloEngine, InMemoryPlayerStore, PlayerStore};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Injected player store
    store: Arc<dyn PlayerStore>,

    /// Core ladder operations
    ladder: Arc<LadderService>,

    /// Metrics collector shared with the ladder and HTTP handlers
    metrics: Arc<MetricsCollector>,

    /// Background task handles (HTTP server included)
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Signals the HTTP server and background tasks to stop
    shutdown_tx: broadcast::Sender<()>,

    /// Service status
    is_running: Arc<RwLock<bool>>,

    started_at: Instant,
}

impl AppState {
    /// Initialize the application with an in-memory player store
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        let store = Arc::new(InMemoryPlayerStore::new(config.storage.max_players));
        Self::with_store(config, store).await
    }

    /// Initialize the application around an existing player store
    pub async fn with_store(
        config: AppConfig,
        store: Arc<dyn PlayerStore>,
    ) -> Result<Self, ServiceError> {
        info!("Initializing {} service", config.service.name);
        info!(
            "Configuration: bind={}, k_factor={}, initial_rating={}",
            config.bind_address(),
            config.rating.k_factor,
            config.rating.initial_rating
        );

        let engine = EloEngine::new(config.rating.to_elo_config()).map_err(|e| {
            ServiceError::Configuration {
                message: format!("Failed to initialize rating engine: {}", e),
            }
        })?;

        let metrics =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let ladder = Arc::new(LadderService::with_metrics(
            store.clone(),
            Arc::new(engine),
            metrics.clone(),
        ));

        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            store,
            ladder,
            metrics,
            background_tasks: Mutex::new(Vec::new()),
            shutdown_tx,
            is_running: Arc::new(RwLock::new(false)),
            started_at: Instant::now(),
        })
    }

    /// Bind the HTTP listener and start all background services.
    ///
    /// Returns the address actually bound, which differs from the configured
    /// one when port 0 is requested.
    pub async fn start(self: &Arc<Self>) -> Result<SocketAddr, ServiceError> {
        info!("Starting {} service", self.config.service.name);

        let listener = TcpListener::bind(self.config.bind_address())
            .await
            .map_err(|e| ServiceError::Server {
                message: format!("Failed to bind {}: {}", self.config.bind_address(), e),
            })?;
        let addr = listener.local_addr().map_err(|e| ServiceError::Server {
            message: format!("Failed to read bound address: {}", e),
        })?;

        // Mark as running
        *self.is_running.write().await = true;

        let server = HttpServer::new(self.router(), self.shutdown_tx.subscribe());
        let server_task = tokio::spawn(async move {
            if let Err(e) = server.run(listener).await {
                error!("HTTP server failed: {}", e);
            }
        });

        let stats_task = self.spawn_stats_task();

        let mut tasks = self.background_tasks.lock().await;
        tasks.push(server_task);
        tasks.push(stats_task);

        info!("✅ Ladder service listening on http://{}", addr);
        Ok(addr)
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of {}", self.config.service.name);

        // Mark as not running
        *self.is_running.write().await = false;

        if self.shutdown_tx.send(()).is_err() {
            debug!("No tasks were listening for the shutdown signal");
        }

        self.stop_background_tasks().await;

        let final_stats =
            self.ladder
                .get_stats()
                .await
                .map_err(|e| ServiceError::BackgroundTask {
                    message: format!("Failed to get final stats: {}", e),
                })?;

        info!("Final ladder statistics: {:?}", final_stats);
        info!("✅ {} shutdown completed", self.config.service.name);

        Ok(())
    }

    /// Full HTTP router: ladder API plus health and metrics endpoints
    pub fn router(self: &Arc<Self>) -> Router {
        crate::api::create_router(self.clone())
            .merge(crate::metrics::health::health_router(self.clone()))
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the ladder service for operations
    pub fn ladder(&self) -> Arc<LadderService> {
        self.ladder.clone()
    }

    /// Get the player store for health checks
    pub fn store(&self) -> Arc<dyn PlayerStore> {
        self.store.clone()
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Periodically refresh gauges from ladder stats
    fn spawn_stats_task(self: &Arc<Self>) -> JoinHandle<()> {
        let ladder = self.ladder.clone();
        let metrics = self.metrics.clone();
        let interval = self.config.stats_interval();
        let started_at = self.started_at;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!("Starting stats update task ({}s interval)...", interval.as_secs());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.recv() => break,
                }

                metrics
                    .service()
                    .uptime_seconds
                    .set(started_at.elapsed().as_secs() as i64);

                match ladder.get_stats().await {
                    Ok(stats) => {
                        debug!(
                            "Updating metrics - players: {}, resolved: {}, failed: {}",
                            stats.players, stats.matches_resolved, stats.matches_failed
                        );
                        metrics.set_player_count(stats.players);
                        metrics.update_component_health("player_store", true);
                        metrics.update_health_status(2);
                    }
                    Err(e) => {
                        warn!("Failed to get ladder stats for metrics update: {}", e);
                        metrics.update_component_health("player_store", false);
                        metrics.update_health_status(0);
                    }
                }
            }

            info!("Stats update task stopped");
        })
    }

    /// Wait for background tasks to finish, aborting any that overrun the timeout
    async fn stop_background_tasks(&self) {
        let tasks: Vec<JoinHandle<()>> = self.background_tasks.lock().await.drain(..).collect();
        let task_count = tasks.len();
        if task_count == 0 {
            info!("No background tasks to stop");
            return;
        }

        info!("Stopping {} background tasks...", task_count);

        for (i, mut task) in tasks.into_iter().enumerate() {
            match tokio::time::timeout(self.config.shutdown_timeout(), &mut task).await {
                Ok(_) => debug!("Background task {}/{} finished", i + 1, task_count),
                Err(_) => {
                    warn!(
                        "Background task {}/{} did not stop in time, aborting",
                        i + 1,
                        task_count
                    );
                    task.abort();
                }
            }
        }

        info!("✅ All {} background tasks stopped", task_count);
    }
}
