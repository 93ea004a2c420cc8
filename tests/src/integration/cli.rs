//! # Command-Line Client
//!
//! Runs `cq` commands through [`cq_cli::execute`] against a live node and
//! checks the JSON line each one prints.

#[cfg(test)]
mod tests {
    use super::super::TestNode;
    use clap::Parser;
    use cq_04_client::QueueSession;
    use cq_cli::{execute, Cli, Command};
    use serde_json::{json, Value};

    const BASE: [&str; 7] = ["cq", "-q", "orders", "-k", "k1", "--secret", "s3cret"];

    async fn run(session: &QueueSession, args: &[&str], stdin: Option<&str>) -> Value {
        let cli = Cli::try_parse_from(BASE.iter().chain(args)).unwrap();
        let mut out = Vec::new();
        execute(session, &cli.command, stdin, &mut out).await.unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'), "{line:?}");
        serde_json::from_str(line.trim_end()).unwrap()
    }

    #[tokio::test]
    async fn test_put_get_peek_ack_len() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");

        let published = run(&session, &["put", r#"{"sku": 42}"#], None).await;
        let id = published["event_id"].as_str().unwrap().to_string();

        let peeked = run(&session, &["get", "--peek"], None).await;
        assert_eq!(peeked["event_id"], id.as_str());
        assert_eq!(peeked["event"], json!({"sku": 42}));
        assert_eq!(run(&session, &["len"], None).await, json!({"length": 1}));

        let acked = run(&session, &["ack", &id], None).await;
        assert_eq!(acked, json!({"removed": true}));
        assert_eq!(run(&session, &["ack", &id], None).await, json!({"removed": false}));
        assert_eq!(run(&session, &["get"], None).await, Value::Null);
    }

    #[tokio::test]
    async fn test_put_from_stdin_then_get_consumes() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");

        run(&session, &["put", "-"], Some(r#"{"from": "stdin"}"#)).await;
        let got = run(&session, &["get"], None).await;
        assert_eq!(got["event"], json!({"from": "stdin"}));
        assert_eq!(run(&session, &["len"], None).await, json!({"length": 0}));
    }

    #[tokio::test]
    async fn test_clear_reports_and_empties() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");
        run(&session, &["put", r#"{"n": 1}"#], None).await;

        assert_eq!(run(&session, &["clear"], None).await, json!({"cleared": true}));
        assert_eq!(run(&session, &["len"], None).await, json!({"length": 0}));
    }

    #[tokio::test]
    async fn test_put_non_object_fails_without_output() {
        let node = TestNode::start().await;
        let session = node.session("orders", "k1", "s3cret");
        let mut out = Vec::new();

        let result = execute(
            &session,
            &Command::Put {
                event: "[1, 2]".into(),
            },
            None,
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert!(out.is_empty());
        assert_eq!(session.len().await.unwrap(), 0);
    }
}
