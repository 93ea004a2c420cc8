//! Backend construction and server lifecycle.

use crate::config::{BackendConfig, NodeConfig};
use cq_02_queue_store::{InMemorySortedSetStore, QueueApi, QueueConfig, QueueStore};
use cq_03_gateway::{GatewayError, GatewayService};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Startup and serve failures.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("backend {backend} unavailable: {reason}")]
    Backend {
        backend: &'static str,
        reason: String,
    },

    #[error("backend {0} not compiled in (rebuild with --features {0})")]
    BackendDisabled(&'static str),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One Queue Store behind one gateway.
pub struct NodeRuntime {
    config: NodeConfig,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Connect the configured backend and wrap it in a Queue Store.
    pub async fn build_queue(&self) -> Result<Arc<dyn QueueApi>, NodeError> {
        build_queue(&self.config.backend, self.config.gateway.queue.clone()).await
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), NodeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let gateway = self.gateway().await?;
        let listener = gateway.bind().await?;
        gateway.serve(listener, shutdown).await?;
        Ok(())
    }

    /// Serve on an already bound listener.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), NodeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let gateway = self.gateway().await?;
        gateway.serve(listener, shutdown).await?;
        Ok(())
    }

    async fn gateway(&self) -> Result<GatewayService, NodeError> {
        let queue = self.build_queue().await?;
        let gateway = GatewayService::new(self.config.gateway.clone(), queue)?;

        let cfg = gateway.config();
        info!(
            backend = self.config.backend.name(),
            max_length = cfg.queue.max_length,
            ttl_secs = cfg.queue.ttl.as_secs(),
            block_timeout_secs = cfg.queue.block_timeout.as_secs(),
            "queue store ready"
        );
        Ok(gateway)
    }
}

async fn build_queue(
    backend: &BackendConfig,
    config: QueueConfig,
) -> Result<Arc<dyn QueueApi>, NodeError> {
    match backend {
        BackendConfig::Memory => Ok(Arc::new(QueueStore::new(
            InMemorySortedSetStore::new(),
            config,
        ))),
        #[cfg(feature = "redis")]
        BackendConfig::Redis { url } => {
            let store = cq_02_queue_store::RedisSortedSetStore::connect(url)
                .await
                .map_err(|e| NodeError::Backend {
                    backend: "redis",
                    reason: e.to_string(),
                })?;
            Ok(Arc::new(QueueStore::new(store, config)))
        }
        #[cfg(not(feature = "redis"))]
        BackendConfig::Redis { .. } => Err(NodeError::BackendDisabled("redis")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_memory_backend_builds() {
        let runtime = NodeRuntime::new(NodeConfig::default());
        let queue = runtime.build_queue().await.unwrap();
        let key = shared_key();
        assert_eq!(queue.len(&key).await.unwrap(), 0);
    }

    #[cfg(not(feature = "redis"))]
    #[tokio::test]
    async fn test_redis_without_feature_is_reported() {
        let config = NodeConfig {
            backend: BackendConfig::Redis {
                url: "redis://127.0.0.1:6379".into(),
            },
            ..Default::default()
        };
        let err = NodeRuntime::new(config).build_queue().await.err().unwrap();
        assert!(matches!(err, NodeError::BackendDisabled("redis")));
    }

    #[tokio::test]
    async fn test_invalid_gateway_config_fails_startup() {
        let mut config = NodeConfig::default();
        config.gateway.queue.max_length = 0;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let err = NodeRuntime::new(config)
            .serve(listener, std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::Gateway(GatewayError::Config(_))));
    }

    #[tokio::test]
    async fn test_serves_health_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(NodeRuntime::new(NodeConfig::default()).serve(
            listener,
            async move {
                let _ = rx.await;
            },
        ));

        let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    fn shared_key() -> shared_types::QueueKey {
        shared_types::QueueKey::new("orders", "k1").unwrap()
    }
}
