//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or full `EnvFilter` syntax)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// ANSI colours in human-readable output
    pub ansi: bool,

    /// Write to stderr instead of stdout
    pub to_stderr: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "cipher-queue".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
            to_stderr: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CQ_SERVICE_NAME`: Service name (default: cipher-queue)
    /// - `CQ_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `CQ_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `NO_COLOR`: Disable ANSI colours when set
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("CQ_SERVICE_NAME").unwrap_or_else(|| "cipher-queue".to_string()),

            log_level: lookup("CQ_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: lookup("CQ_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            ansi: lookup("NO_COLOR").is_none(),

            to_stderr: false,
        }
    }

    /// Same as [`from_env`](Self::from_env) with the service name fixed.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}
