//! HTTP server wrapper with graceful shutdown

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

/// Serves a router on a bound listener until the shutdown channel fires
pub struct HttpServer {
    router: Router,
    shutdown_rx: broadcast::Receiver<()>,
}

impl HttpServer {
    pub fn new(router: Router, shutdown_rx: broadcast::Receiver<()>) -> Self {
        Self {
            router,
            shutdown_rx,
        }
    }

    /// Run the server; in-flight requests finish before this returns
    pub async fn run(self, listener: TcpListener) -> Result<()> {
        let mut shutdown_rx = self.shutdown_rx;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Duration;

    #[tokio::test]
    async fn test_server_stops_on_signal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let router = Router::new().route("/", get(|| async { "ok" }));

        let task = tokio::spawn(HttpServer::new(router, shutdown_rx).run(listener));
        shutdown_tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
