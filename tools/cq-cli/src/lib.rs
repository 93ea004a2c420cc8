//! `cq`: put and take events from the shell.
//!
//! ```text
//! cq -q orders -k k1 --secret s3cret put '{"sku": 42}'
//! cq -q orders -k k1 --secret s3cret get --block
//! cq -q orders -k k1 --secret s3cret get --peek
//! cq -q orders -k k1 --secret s3cret ack 1700000000000000000
//! ```
//!
//! Output is one JSON document per line on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cq_04_client::{ClientConfig, QueueSession, Transport};
use serde_json::{json, Map, Value};
use shared_types::EventId;
use std::io::Write;
use std::time::Duration;

/// Cipher-Queue command-line client
#[derive(Parser, Debug)]
#[command(name = "cq", version)]
#[command(about = "Publish and consume end-to-end encrypted queue events")]
pub struct Cli {
    /// Server base URL; repeat or comma-separate for several
    #[arg(short, long = "server", env = "CQ_SERVER_ADDRS", value_delimiter = ',')]
    pub servers: Vec<String>,

    /// Queue name
    #[arg(short, long, env = "CQ_QUEUE")]
    pub queue: String,

    /// Access key for the queue
    #[arg(short = 'k', long = "key", env = "CQ_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    /// Secret the envelope key is derived from
    #[arg(long, env = "CQ_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Attempts per blocking get
    #[arg(long)]
    pub max_polls: Option<u32>,

    /// Minimum spacing between blocking attempts, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Publish one event (a JSON object, or `-` to read it from stdin)
    Put { event: String },

    /// Fetch the earliest event
    Get {
        /// Leave the event queued; acknowledge it later with `ack`
        #[arg(long)]
        peek: bool,

        /// Wait for an event instead of returning at once
        #[arg(long)]
        block: bool,
    },

    /// Acknowledge a peeked event
    Ack { event_id: EventId },

    /// Delete every queued event
    Clear,

    /// Number of queued events
    Len,
}

impl Cli {
    /// Client settings: environment defaults overridden by flags.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder().servers(self.servers.iter().cloned());
        let defaults = ClientConfig::from_env()?;

        if self.servers.is_empty() {
            builder = builder.servers(defaults.server_addrs);
        }
        builder = builder
            .max_polls(self.max_polls.unwrap_or(defaults.poll.max_polls))
            .poll_interval(
                self.poll_interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.poll.interval),
            )
            .request_timeout(defaults.request_timeout)
            .server_block_window(defaults.server_block_window);

        Ok(builder.build()?)
    }
}

/// Parse an event argument into a JSON object.
pub fn parse_event(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(raw).context("event is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("event must be a JSON object, got {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Run one command against `session`, writing its result to `out`.
///
/// `event` is the already-read event body for `put`.
pub async fn execute<T: Transport>(
    session: &QueueSession<T>,
    command: &Command,
    event: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let reply = match command {
        Command::Put { event: arg } => {
            let event = parse_event(event.unwrap_or(arg))?;
            let event_id = session.put(&event).await?;
            json!({ "event_id": event_id })
        }
        Command::Get { peek, block } => match session.get(!peek, *block).await? {
            Some(delivery) => json!({
                "event_id": delivery.event_id(),
                "event": delivery.event,
            }),
            None => Value::Null,
        },
        Command::Ack { event_id } => json!({ "removed": session.ack(*event_id).await? }),
        Command::Clear => json!({ "cleared": session.clear().await? }),
        Command::Len => json!({ "length": session.len().await? }),
    };

    writeln!(out, "{reply}")?;
    Ok(())
}
