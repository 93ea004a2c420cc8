//! reqwest implementation of [`Transport`].
//!
//! Status mapping:
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 2xx with body | `Ok` |
//! | 204 / 205 | `Empty` |
//! | 400 with code `queue_full` | `CapacityExceeded` |
//! | anything else | `Error` |

use crate::ports::{Transport, TransportError, TransportOutcome};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared_types::{
    AckResponse, ClearResponse, ErrorBody, ErrorCode, EventId, FetchResponse, PublishRequest,
    PublishResponse, QueueKey, StatsResponse,
};
use std::time::Duration;
use tracing::debug;

/// HTTP transport over a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(Self { client })
    }

    /// Use an existing client (shares its pool and settings).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        addr: &str,
        request: RequestBuilder,
    ) -> TransportOutcome<T> {
        // URLs carry the access key; strip them from error text.
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return TransportOutcome::Error(TransportError::Connection {
                    addr: addr.to_string(),
                    reason: e.without_url().to_string(),
                })
            }
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return TransportOutcome::Empty;
        }

        if status.is_success() {
            return match response.json::<T>().await {
                Ok(body) => TransportOutcome::Ok(body),
                Err(e) => TransportOutcome::Error(TransportError::Decode(
                    e.without_url().to_string(),
                )),
            };
        }

        let text = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "server rejected request");
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if body.code == ErrorCode::QueueFull => TransportOutcome::CapacityExceeded,
            Ok(body) => TransportOutcome::Error(TransportError::Status {
                status: status.as_u16(),
                message: body.message,
            }),
            Err(_) => TransportOutcome::Error(TransportError::Status {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}

/// `addr` joined with percent-encoded path segments.
fn queue_url(addr: &str, queue: &QueueKey, tail: &[&str]) -> Result<Url, TransportError> {
    let mut url = Url::parse(addr)
        .map_err(|e| TransportError::InvalidRequest(format!("bad server address {addr:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidRequest(format!("{addr:?} cannot be a base URL")))?
        .pop_if_empty()
        .push(queue.name())
        .push(queue.access_key())
        .extend(tail);
    Ok(url)
}

macro_rules! url_or_bail {
    ($expr:expr) => {
        match $expr {
            Ok(url) => url,
            Err(e) => return TransportOutcome::Error(e),
        }
    };
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        addr: &str,
        queue: &QueueKey,
        ack: bool,
        block: bool,
    ) -> TransportOutcome<FetchResponse> {
        let url = url_or_bail!(queue_url(addr, queue, &[]));
        let request = self
            .client
            .get(url)
            .query(&[("ack", ack), ("block", block)]);
        self.send(addr, request).await
    }

    async fn publish(
        &self,
        addr: &str,
        queue: &QueueKey,
        request: &PublishRequest,
    ) -> TransportOutcome<PublishResponse> {
        let url = url_or_bail!(queue_url(addr, queue, &[]));
        self.send(addr, self.client.post(url).json(request)).await
    }

    async fn acknowledge(
        &self,
        addr: &str,
        queue: &QueueKey,
        event_id: EventId,
    ) -> TransportOutcome<AckResponse> {
        let id = event_id.to_string();
        let url = url_or_bail!(queue_url(addr, queue, &[id.as_str()]));
        self.send(addr, self.client.post(url)).await
    }

    async fn clear(&self, addr: &str, queue: &QueueKey) -> TransportOutcome<ClearResponse> {
        let url = url_or_bail!(queue_url(addr, queue, &[]));
        self.send(addr, self.client.delete(url)).await
    }

    async fn stats(&self, addr: &str, queue: &QueueKey) -> TransportOutcome<StatsResponse> {
        let url = url_or_bail!(queue_url(addr, queue, &["stats"]));
        self.send(addr, self.client.get(url)).await
    }
}
