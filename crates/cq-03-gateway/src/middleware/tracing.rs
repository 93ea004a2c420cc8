//! Request tracing middleware.
//!
//! Wraps every request in an `api_request` span. The span names the queue
//! (first path segment) but never the access key, which is the second.

use axum::{body::Body, http::Request, response::Response};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{debug, info_span, Instrument, Span};

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let span = info_span!(
            "api_request",
            http.method = %req.method(),
            queue = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        );
        if let Some(queue) = queue_name(req.uri().path()) {
            span.record("queue", queue);
        }

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;

                if let Ok(response) = &result {
                    let status = response.status().as_u16();
                    Span::current().record("http.status_code", status);
                    debug!(
                        status,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "request completed"
                    );
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Queue name of a `/{queue}/{key}/...` path; `None` for non-queue routes.
fn queue_name(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    let queue = segments.next().filter(|s| !s.is_empty())?;
    segments.next().filter(|s| !s.is_empty())?;
    Some(queue)
}
