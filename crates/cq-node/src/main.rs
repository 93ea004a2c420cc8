//! `cq-node`: serve encrypted queues over HTTP.

use anyhow::{Context, Result};
use cq_node::{NodeConfig, NodeRuntime};
use cq_telemetry::{init_logging, TelemetryConfig};
use tracing::{info, warn};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::for_service("cq-node")).context("failed to initialize logging")?;

    let config = NodeConfig::from_env().context("invalid node configuration")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.gateway.http_addr(),
        backend = config.backend.name(),
        "starting cipher-queue node"
    );

    NodeRuntime::new(config).run(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}
