//! # Client Flows
//!
//! Producer and consumer sessions against one live node:
//!
//! 1. **put → get(ack)**: event arrives once, then the queue is empty
//! 2. **get(peek) → ack**: peeked event stays until acknowledged
//! 3. **capacity**: a full queue rejects with a distinct error
//! 4. **isolation**: name and access key together select the queue
//! 5. **secrets**: a consumer with the wrong secret sees `Corrupt`

#[cfg(test)]
mod tests {
    use super::super::{session_for, TestNode};
    use cq_02_queue_store::QueueConfig;
    use cq_04_client::{ClientConfig, ClientError};
    use serde_json::{json, Value};
    use std::time::Duration;

    #[tokio::test]
    async fn test_put_then_get_delivers_once() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");

        let id = session.put(&json!({"x": 1})).await.unwrap();
        let delivery = session.get(true, false).await.unwrap().unwrap();

        assert_eq!(delivery.event_id(), id);
        assert_eq!(Value::Object(delivery.event), json!({"x": 1}));
        assert!(session.get(true, false).await.unwrap().is_none());

        node.shutdown().await;
    }

    #[tokio::test]
    async fn test_events_come_back_in_publish_order() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");

        for n in 0..5 {
            session.put(&json!({ "n": n })).await.unwrap();
        }
        for n in 0..5 {
            let delivery = session.get(true, false).await.unwrap().unwrap();
            assert_eq!(delivery.event["n"], n);
        }
    }

    #[tokio::test]
    async fn test_peek_leaves_event_until_ack() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");
        session.put(&json!({"job": "resize"})).await.unwrap();

        let first = session.get(false, false).await.unwrap().unwrap();
        let again = session.get(false, false).await.unwrap().unwrap();
        assert_eq!(first.event_id(), again.event_id());
        assert_eq!(session.len().await.unwrap(), 1);

        assert!(first.ack().await.unwrap());
        assert!(!again.ack().await.unwrap(), "second ack is a no-op");
        assert_eq!(session.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_full_queue_rejects_put() {
        let node = TestNode::start_with(QueueConfig {
            max_length: 2,
            ..Default::default()
        })
        .await;
        let session = node.session("orders", "k1", "s3cret");

        session.put(&json!({"n": 1})).await.unwrap();
        session.put(&json!({"n": 2})).await.unwrap();
        let err = session.put(&json!({"n": 3})).await.unwrap_err();
        assert!(err.is_capacity(), "got {err:?}");

        session.get(true, false).await.unwrap().unwrap();
        session.put(&json!({"n": 3})).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_object_rejected_before_sending() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");

        let err = session.put(&json!("just a string")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(session.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_access_key_selects_queue() {
        let node = TestNode::start().await;
        let alice = node.session("orders", "alice", "s3cret");
        let bob = node.session("orders", "bob", "s3cret");

        alice.put(&json!({"owner": "alice"})).await.unwrap();

        assert!(bob.get(true, false).await.unwrap().is_none());
        let delivery = alice.get(true, false).await.unwrap().unwrap();
        assert_eq!(delivery.event["owner"], "alice");
    }

    #[tokio::test]
    async fn test_wrong_secret_reads_corrupt() {
        let node = TestNode::start().await;
        let producer = node.session("orders", "k1", "s3cret");
        let intruder = node.session("orders", "k1", "guess");

        let id = producer.put(&json!({"x": 1})).await.unwrap();
        match intruder.get(false, false).await {
            Err(ClientError::Corrupt { event_id }) => assert_eq!(event_id, id),
            other => panic!("expected Corrupt, got {other:?}"),
        }

        // Peek left it in place for the rightful consumer.
        assert!(producer.get(true, false).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_empties_queue() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");
        session.put(&json!({"n": 1})).await.unwrap();
        session.put(&json!({"n": 2})).await.unwrap();

        assert!(session.clear().await.unwrap());
        assert_eq!(session.len().await.unwrap(), 0);
        assert!(session.get(true, false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sessions_spread_across_nodes_share_nothing() {
        let a = TestNode::start().await;
        let b = TestNode::start().await;
        let config = ClientConfig::builder()
            .servers([a.url(), b.url()])
            .poll_interval(Duration::from_millis(10))
            .max_polls(1)
            .build()
            .unwrap();
        let session = session_for(config, "orders", "k1", "s3cret");

        for n in 0..20 {
            session.put(&json!({ "n": n })).await.unwrap();
        }

        let key = session.queue().clone();
        let on_a = a.queue.len(&key).await.unwrap();
        let on_b = b.queue.len(&key).await.unwrap();
        assert_eq!(on_a + on_b, 20);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error_for_put() {
        let node = TestNode::start().await;
        let config = ClientConfig::builder()
            .server(node.url())
            .request_timeout(Duration::from_secs(2))
            .server_block_window(Duration::from_secs(1))
            .build()
            .unwrap();
        node.shutdown().await;

        let session = session_for(config, "orders", "k1", "s3cret");
        let err = session.put(&json!({"x": 1})).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
        // get swallows the same failure.
        assert!(session.get(true, false).await.unwrap().is_none());
    }
}
