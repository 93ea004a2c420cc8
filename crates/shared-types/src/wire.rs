//! # Wire DTOs
//!
//! JSON bodies exchanged over the HTTP transport.
//!
//! | Operation | Method | Path | Request | Success |
//! |-----------|--------|------|---------|---------|
//! | Fetch | GET | `/{queue}/{key}?ack=&block=` | - | 200 [`FetchResponse`] / 204 |
//! | Publish | POST | `/{queue}/{key}` | [`PublishRequest`] | 201 [`PublishResponse`] |
//! | Acknowledge | POST | `/{queue}/{key}/{event_id}` | - | 200 [`AckResponse`] |
//! | Clear | DELETE | `/{queue}/{key}` | - | 200 [`ClearResponse`] |
//! | Stats | GET | `/{queue}/{key}/stats` | - | 200 [`StatsResponse`] |
//!
//! Failures carry an [`ErrorBody`].

use crate::entities::EventId;
use serde::{Deserialize, Serialize};

/// A sealed event as carried on the wire: base64 of `nonce || ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeBody {
    pub data: String,
}

/// Body of a publish call.
///
/// `event_id` is the producer's timestamp; when omitted the gateway assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
}

/// Reply to a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    pub event_id: EventId,
}

/// Reply to a fetch that found an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub event_id: EventId,
    pub envelope: EnvelopeBody,
}

/// Reply to an acknowledge call. `removed` is false when the id was already gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Machine-readable failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The queue is at its configured maximum length.
    QueueFull,
    /// Malformed path, query or body.
    InvalidRequest,
    /// The backing store could not be reached.
    BackendUnavailable,
    Internal,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_request_without_event_id() {
        let req: PublishRequest = serde_json::from_str(r#"{"data":"AAAA"}"#).unwrap();
        assert_eq!(req.event_id, None);
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"data":"AAAA"}"#);
    }

    #[test]
    fn test_fetch_response_shape() {
        let resp = FetchResponse {
            event_id: EventId(7),
            envelope: EnvelopeBody {
                data: "Zm9v".into(),
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["event_id"], "7");
        assert_eq!(json["envelope"]["data"], "Zm9v");
    }

    #[test]
    fn test_error_code_snake_case() {
        let body = ErrorBody {
            code: ErrorCode::QueueFull,
            message: "full".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"queue_full\""));
    }
}
