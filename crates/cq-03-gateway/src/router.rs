//! HTTP routes.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | [`health_check`] |
//! | GET | `/:queue/:key` | [`fetch`] |
//! | POST | `/:queue/:key` | [`publish`] |
//! | DELETE | `/:queue/:key` | [`clear`] |
//! | GET | `/:queue/:key/stats` | [`stats`] |
//! | POST | `/:queue/:key/:event_id` | [`acknowledge`] |
//!
//! Handlers are thin: parse, call [`QueueApi`], shape the reply.

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::query::FetchQuery;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cq_02_queue_store::{FetchOutcome, QueueApi};
use shared_types::{
    AckResponse, ClearResponse, EnvelopeBody, EventId, FetchResponse, HealthResponse,
    MonotonicClock, PublishRequest, PublishResponse, QueueKey, StatsResponse,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<dyn QueueApi>,
    /// Mints ids for publishes that arrive without one.
    pub clock: Arc<MonotonicClock>,
}

impl AppState {
    pub fn new(queue: Arc<dyn QueueApi>) -> Self {
        Self {
            queue,
            clock: Arc::new(MonotonicClock::new()),
        }
    }
}

/// Build the route table (no middleware).
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/:queue/:key", get(fetch).post(publish).delete(clear))
        .route("/:queue/:key/stats", get(stats))
        .route("/:queue/:key/:event_id", post(acknowledge))
        .with_state(state)
}

fn queue_key(path: Result<Path<(String, String)>, PathRejection>) -> ApiResult<QueueKey> {
    let Path((name, key)) = path?;
    Ok(QueueKey::new(name, key)?)
}

/// `GET /:queue/:key?ack=&block=`
pub async fn fetch(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<FetchQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let queue = queue_key(path)?;
    let Query(query) = query?;
    let mode = query.mode()?;

    match state.queue.fetch(&queue, mode).await? {
        FetchOutcome::Event(event) => Ok(Json(FetchResponse {
            event_id: event.event_id,
            envelope: EnvelopeBody {
                data: event.envelope,
            },
        })
        .into_response()),
        FetchOutcome::Empty => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `POST /:queue/:key` with a [`PublishRequest`] body.
pub async fn publish(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PublishResponse>)> {
    let queue = queue_key(path)?;
    let Json(request) = body?;
    if request.data.is_empty() {
        return Err(ApiError::invalid_request("envelope data is empty"));
    }

    let event_id = request.event_id.unwrap_or_else(|| state.clock.next_id());
    let event_id = state.queue.publish(&queue, request.data, event_id).await?;

    Ok((StatusCode::CREATED, Json(PublishResponse { event_id })))
}

/// `POST /:queue/:key/:event_id`
pub async fn acknowledge(
    State(state): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<Json<AckResponse>> {
    let Path((name, key, event_id)) = path?;
    let queue = QueueKey::new(name, key)?;
    let event_id: EventId = event_id.parse()?;

    let outcome = state.queue.acknowledge(&queue, event_id).await?;
    Ok(Json(AckResponse {
        removed: outcome.removed(),
    }))
}

/// `DELETE /:queue/:key`
pub async fn clear(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<ClearResponse>> {
    let queue = queue_key(path)?;
    state.queue.clear(&queue).await?;
    Ok(Json(ClearResponse { cleared: true }))
}

/// `GET /:queue/:key/stats`
pub async fn stats(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<StatsResponse>> {
    let queue = queue_key(path)?;
    let length = state.queue.len(&queue).await?;
    Ok(Json(StatsResponse {
        length: length as u64,
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: crate::VERSION.into(),
    })
}
