//! # DAG Node Telemetry
//!
//! Logging and metrics for the node runtime.
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, pretty for
//!   development or JSON for log shippers.
//! - **Metrics**: Prometheus counters in a process-wide registry, rendered in
//!   text exposition format by [`encode_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dagnode_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DAGNODE_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `DAGNODE_JSON_LOGS` | `false` | Emit JSON instead of pretty logs |
//! | `DAGNODE_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |
//! | `DAGNODE_SERVICE_NAME` | `dagnode` | Service name attached to logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, DAG_NOTIFICATIONS, LIFECYCLE_TRANSITIONS, REGISTRY,
    SEED_ADDRESSES, SEED_FAILURES, SUBSYSTEM_ERRORS,
};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register all metrics.
///
/// The returned guard should be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
