//! # HTTP Contract
//!
//! Raw requests against the gateway, checking status codes and bodies that
//! non-Rust clients depend on.

#[cfg(test)]
mod tests {
    use super::super::{codec, TestNode};
    use cq_02_queue_store::QueueConfig;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use shared_types::{ErrorBody, ErrorCode, EventId, FetchResponse, PublishResponse};

    #[tokio::test]
    async fn test_publish_fetch_over_raw_http() {
        let node = TestNode::start().await;
        let http = reqwest::Client::new();
        let url = format!("{}/orders/k1", node.url());
        let envelope = codec("s3cret").seal(&json!({"x": 1})).unwrap();

        let response = http
            .post(&url)
            .json(&json!({ "data": envelope, "event_id": "1700000000000000001" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let published: PublishResponse = response.json().await.unwrap();
        assert_eq!(published.event_id, EventId(1_700_000_000_000_000_001));

        let response = http
            .get(&url)
            .query(&[("ack", "true")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let raw: Value = response.json().await.unwrap();
        assert_eq!(raw["event_id"], "1700000000000000001", "ids travel as strings");

        let fetched: FetchResponse = serde_json::from_value(raw).unwrap();
        let event = codec("s3cret").open(&fetched.envelope.data).unwrap();
        assert_eq!(Value::Object(event), json!({"x": 1}));

        let response = http.get(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_server_assigns_id_when_absent() {
        let node = TestNode::start().await;
        let http = reqwest::Client::new();
        let url = format!("{}/orders/k1", node.url());

        let first: PublishResponse = http
            .post(&url)
            .json(&json!({ "data": "b3BhcXVl" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let second: PublishResponse = http
            .post(&url)
            .json(&json!({ "data": "b3BhcXVl" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(second.event_id > first.event_id);
    }

    #[tokio::test]
    async fn test_queue_full_error_body() {
        let node = TestNode::start_with(QueueConfig {
            max_length: 1,
            ..Default::default()
        })
        .await;
        let http = reqwest::Client::new();
        let url = format!("{}/orders/k1", node.url());

        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let response = http
                .post(&url)
                .json(&json!({ "data": "b3BhcXVl" }))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
            if expected == StatusCode::BAD_REQUEST {
                let body: ErrorBody = response.json().await.unwrap();
                assert_eq!(body.code, ErrorCode::QueueFull);
            }
        }
    }

    #[tokio::test]
    async fn test_bad_requests_are_400() {
        let node = TestNode::start().await;
        let http = reqwest::Client::new();
        let base = node.url();

        let bad_id = http
            .post(format!("{base}/orders/k1/not-a-number"))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = bad_id.json().await.unwrap();
        assert_eq!(body.code, ErrorCode::InvalidRequest);

        let bad_flag = http
            .get(format!("{base}/orders/k1?ack=maybe"))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_flag.status(), StatusCode::BAD_REQUEST);

        let empty_data = http
            .post(format!("{base}/orders/k1"))
            .json(&json!({ "data": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(empty_data.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ack_of_unknown_id_reports_not_removed() {
        let node = TestNode::start().await;
        let body: Value = reqwest::Client::new()
            .post(format!("{}/orders/k1/42", node.url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({ "removed": false }));
    }

    #[tokio::test]
    async fn test_stats_and_health() {
        let node = TestNode::start().await;
        let http = reqwest::Client::new();

        let stats: Value = http
            .get(format!("{}/orders/k1/stats", node.url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats, json!({ "length": 0 }));

        let health: Value = http
            .get(format!("{}/health", node.url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
    }
}
