//! Prometheus metrics for the node runtime.
//!
//! All metrics follow the naming convention: `dagnode_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Start/stop attempts by outcome
    pub static ref LIFECYCLE_TRANSITIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("dagnode_lifecycle_transitions_total", "Start and stop calls by outcome"),
        &["transition"]  // start, start_ignored, stop, stop_ignored
    ).expect("metric creation failed");

    // =========================================================================
    // NOTIFICATION BRIDGE
    // =========================================================================

    /// DAG notifications seen by the bridge
    pub static ref DAG_NOTIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("dagnode_dag_notifications_total", "DAG notifications handled by the RPC bridge"),
        &["kind", "outcome"]  // outcome: forwarded/skipped/ignored
    ).expect("metric creation failed");

    // =========================================================================
    // SEEDING
    // =========================================================================

    /// Addresses received from seeders
    pub static ref SEED_ADDRESSES: IntCounterVec = IntCounterVec::new(
        Opts::new("dagnode_seed_addresses_total", "Addresses received from seed sources"),
        &["source"]  // dns, grpc
    ).expect("metric creation failed");

    /// Failed seed lookups
    pub static ref SEED_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("dagnode_seed_failures_total", "Seed lookups that failed"),
        &["source"]
    ).expect("metric creation failed");

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Non-fatal collaborator errors
    pub static ref SUBSYSTEM_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("dagnode_subsystem_errors_total", "Errors by component and type"),
        &["component", "error_type"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LIFECYCLE_TRANSITIONS.clone()),
        Box::new(DAG_NOTIFICATIONS.clone()),
        Box::new(SEED_ADDRESSES.clone()),
        Box::new(SEED_FAILURES.clone()),
        Box::new(SUBSYSTEM_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_counter_increment() {
        let before = SEED_ADDRESSES.with_label_values(&["dns"]).get();
        SEED_ADDRESSES.with_label_values(&["dns"]).inc_by(2);
        assert!(SEED_ADDRESSES.with_label_values(&["dns"]).get() >= before + 2);
    }
}
