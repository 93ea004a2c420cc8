//! Subscriber installation.
//!
//! JSON lines carry `timestamp`, `level`, `target`, the span stack and any
//! structured fields; log shippers can parse them without regexes.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter for `config`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let writer = if config.to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(config.ansi)
            .with_writer(writer);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        filter = %config.log_level,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_rejected() {
        let config = TelemetryConfig {
            log_level: "cq=loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(env_filter(&config), Err(TelemetryError::Filter(_))));
    }

    #[test]
    fn test_module_directives_accepted() {
        let config = TelemetryConfig {
            log_level: "warn,cq_03_gateway=debug".to_string(),
            ..Default::default()
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig::default();
        // The first call may lose to another test in this binary; the second never wins.
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
