//! # Blocking Fetch
//!
//! Server-side waits combined with client-side bounded polling. These run in
//! real time with short windows.

#[cfg(test)]
mod tests {
    use super::super::TestNode;
    use cq_02_queue_store::QueueConfig;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn short_window(block_timeout: Duration) -> QueueConfig {
        QueueConfig {
            block_timeout,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blocking_get_wakes_on_put() {
        let node = TestNode::start_with(short_window(Duration::from_secs(3))).await;
        let consumer = node.session("jobs", "k1", "s3cret");
        let producer = node.session("jobs", "k1", "s3cret");

        let started = Instant::now();
        let waiting = tokio::spawn(async move { consumer.get(true, true).await });

        tokio::time::sleep(Duration::from_millis(200)).await;
        producer.put(&json!({"job": 7})).await.unwrap();

        let delivery = waiting.await.unwrap().unwrap().unwrap();
        assert_eq!(delivery.event["job"], 7);
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "woke only after the server window closed"
        );
        assert_eq!(producer.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blocking_get_gives_up_after_polls() {
        let node = TestNode::start_with(short_window(Duration::from_millis(300))).await;
        let session = node.session("jobs", "k1", "s3cret");
        assert_eq!(session.poll_policy().max_polls, 2);

        let started = Instant::now();
        assert!(session.get(true, true).await.unwrap().is_none());

        // Two server windows, nothing more.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(550), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_blocking_peek_leaves_event_queued() {
        let node = TestNode::start_with(short_window(Duration::from_secs(3))).await;
        let consumer = node.session("jobs", "k1", "s3cret");
        let producer = node.session("jobs", "k1", "s3cret");

        let waiting = tokio::spawn(async move { consumer.get(false, true).await });
        tokio::time::sleep(Duration::from_millis(200)).await;
        let id = producer.put(&json!({"job": "peeked"})).await.unwrap();

        let delivery = waiting.await.unwrap().unwrap().unwrap();
        assert_eq!(delivery.event_id(), id);
        assert_eq!(producer.len().await.unwrap(), 1);

        assert!(delivery.ack().await.unwrap());
        assert_eq!(producer.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_one_event_one_blocking_consumer() {
        let node = TestNode::start_with(short_window(Duration::from_millis(800))).await;
        let producer = node.session("jobs", "k1", "s3cret");

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let session = node.session("jobs", "k1", "s3cret");
                tokio::spawn(async move { session.get(true, true).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(150)).await;
        producer.put(&json!({"only": true})).await.unwrap();

        let mut received = 0;
        for consumer in consumers {
            if consumer.await.unwrap().unwrap().is_some() {
                received += 1;
            }
        }
        assert_eq!(received, 1);
    }
}
