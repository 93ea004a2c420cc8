use anyhow::{Context, Result};
use clap::Parser;
use cq_04_client::QueueSession;
use cq_cli::{execute, Cli, Command};
use cq_telemetry::{init_logging, TelemetryConfig};
use tokio::io::AsyncReadExt;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::for_service("cq");
    if std::env::var_os("CQ_LOG_LEVEL").is_none() && std::env::var_os("RUST_LOG").is_none() {
        telemetry.log_level = "warn".to_string();
    }
    telemetry.to_stderr = true;
    init_logging(&telemetry).context("failed to initialize logging")?;

    let stdin_event = match &cli.command {
        Command::Put { event } if event == "-" => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read event from stdin")?;
            Some(buf)
        }
        _ => None,
    };

    let config = cli.client_config()?;
    debug!(queue = %cli.queue, servers = ?config.server_addrs, "opening session");
    let session = QueueSession::connect(
        cli.queue.clone(),
        cli.access_key.clone(),
        cli.secret.as_bytes(),
        config,
    )?;

    let mut stdout = std::io::stdout().lock();
    execute(&session, &cli.command, stdin_event.as_deref(), &mut stdout).await
}
