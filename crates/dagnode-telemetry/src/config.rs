//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log filter directive (e.g. `info`, `dagnode_runtime=debug`)
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include thread ids in each line
    pub thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dagnode".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            thread_ids: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DAGNODE_SERVICE_NAME`: Service name (default: dagnode)
    /// - `DAGNODE_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DAGNODE_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `DAGNODE_JSON_LOGS`: Enable JSON logs (default: true inside containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("DAGNODE_SERVICE_NAME")
                .unwrap_or_else(|_| "dagnode".to_string()),

            log_level: env::var("DAGNODE_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("DAGNODE_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("DAGNODE_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            thread_ids: true,
        }
    }

    /// Override the log level, e.g. from the node configuration file.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "dagnode");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_with_log_level() {
        let config = TelemetryConfig::default().with_log_level("debug");
        assert_eq!(config.log_level, "debug");
    }
}
