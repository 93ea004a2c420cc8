//! Cross-crate flows against a live gateway.
//!
//! [`TestNode`] serves an in-memory Queue Store on `127.0.0.1:0` and stops it
//! when dropped. Sessions use cheap KDF parameters; both ends of a test must
//! use the same ones or every event reads as corrupt.

use cq_01_envelope::{EnvelopeCodec, KdfParams};
use cq_02_queue_store::{InMemorySortedSetStore, QueueApi, QueueConfig, QueueStore};
use cq_03_gateway::{GatewayConfig, GatewayService};
use cq_04_client::{ClientConfig, HttpTransport, QueueSession};
use shared_types::QueueKey;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub mod blocking;
pub mod cli;
pub mod flows;
pub mod wire;

pub const FAST_KDF: KdfParams = KdfParams {
    log_n: 4,
    r: 8,
    p: 1,
};

/// A running gateway.
pub struct TestNode {
    pub addr: SocketAddr,
    pub queue: Arc<dyn QueueApi>,
    block_window: Duration,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestNode {
    pub async fn start() -> Self {
        Self::start_with(QueueConfig::default()).await
    }

    pub async fn start_with(queue_config: QueueConfig) -> Self {
        let block_window = queue_config.block_timeout;
        let mut config = GatewayConfig::default();
        config.queue = queue_config.clone();
        config.http.shutdown_grace = Duration::from_millis(100);
        config.limits.request_timeout = queue_config.block_timeout + Duration::from_secs(5);

        let queue: Arc<dyn QueueApi> =
            Arc::new(QueueStore::new(InMemorySortedSetStore::new(), queue_config));
        let service = GatewayService::new(config, Arc::clone(&queue)).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            service
                .serve(listener, async move {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            queue,
            block_window,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client config pointing at this node only.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .server(self.url())
            .poll_interval(Duration::from_millis(50))
            .max_polls(2)
            .request_timeout(self.block_window + Duration::from_secs(5))
            .server_block_window(self.block_window)
            .build()
            .unwrap()
    }

    pub fn session(&self, name: &str, key: &str, secret: &str) -> QueueSession {
        session_for(self.client_config(), name, key, secret)
    }

    /// Stop serving and wait for the server task.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .unwrap()
                .unwrap();
        }
    }
}

impl Drop for TestNode {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

pub fn session_for(config: ClientConfig, name: &str, key: &str, secret: &str) -> QueueSession {
    let transport = HttpTransport::new(config.request_timeout).unwrap();
    QueueSession::with_transport(
        QueueKey::new(name, key).unwrap(),
        EnvelopeCodec::from_secret_with_params(secret, FAST_KDF).unwrap(),
        config,
        transport,
    )
    .unwrap()
}

pub fn codec(secret: &str) -> EnvelopeCodec {
    EnvelopeCodec::from_secret_with_params(secret, FAST_KDF).unwrap()
}
