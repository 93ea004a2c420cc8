//! Gateway service: router assembly and server lifecycle.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::TracingLayer;
use crate::router::{routes, AppState};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use cq_02_queue_store::QueueApi;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// HTTP front of one Queue Store.
pub struct GatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayService {
    /// Create a gateway over `queue`. Fails if `config` does not validate.
    pub fn new(config: GatewayConfig, queue: Arc<dyn QueueApi>) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState::new(queue),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Routes plus the middleware stack.
    pub fn router(&self) -> Router {
        routes(self.state.clone())
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(self.config.limits.request_timeout))
            .layer(TracingLayer::new())
    }

    /// Bind the configured HTTP address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// After shutdown is requested, in-flight requests get
    /// `http.shutdown_grace` to finish; whatever is still running then (in
    /// practice parked blocking fetches) is dropped.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local_addr, "Starting HTTP server");

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            shutdown.await;
            let _ = stop_tx.send(true);
        });

        let mut graceful_rx = stop_rx.clone();
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            let _ = graceful_rx.wait_for(|stop| *stop).await;
            info!("Received shutdown signal");
        })
        .into_future();

        let grace = self.config.http.shutdown_grace;
        let mut deadline_rx = stop_rx;
        let drain_deadline = async move {
            let _ = deadline_rx.wait_for(|stop| *stop).await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = server => {
                result.map_err(|e| GatewayError::Serve(e.to_string()))?;
            }
            _ = drain_deadline => {
                warn!(grace_ms = grace.as_millis() as u64, "shutdown grace elapsed, dropping in-flight requests");
            }
        }

        info!("HTTP server stopped");
        Ok(())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
