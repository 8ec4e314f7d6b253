//! # Lifecycle Controller
//!
//! Owns the node graph and runs the start and stop sequences exactly once
//! each, no matter how many tasks call them.
//!
//! ## Start
//!
//! 1. Start the transport (failure is fatal)
//! 2. Spawn seed lookups without waiting for them
//! 3. Start the connection manager
//!
//! ## Stop
//!
//! 1. Stop the connection manager
//! 2. Stop the transport
//!
//! Stop errors are logged and shutdown carries on.
//!
//! Start and stop use independent slots. A stop issued while start is still
//! running is not delayed.

pub mod shutdown;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use dagnode_telemetry::{LIFECYCLE_TRANSITIONS, SUBSYSTEM_ERRORS};
use dagnode_types::PeerId;

use crate::container::NodeGraph;
use crate::error::NodeError;
use crate::ports::AddressBook;

pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownRequester};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

/// Single-assignment slot. Claimed at most once, never reset.
#[derive(Debug, Default)]
struct Slot(AtomicU8);

impl Slot {
    fn claim(&self) -> bool {
        self.0
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish(&self) {
        self.0.store(DONE, Ordering::Release);
    }

    fn load(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }
}

/// Observable lifecycle state, derived from the start and stop slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Starting,
    Started,
    Stopping,
    Stopped,
}

/// Result of a [`NodeRuntime::start`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// This call ran the start sequence.
    Started,
    /// Another call already claimed start; nothing was done.
    AlreadyStarted,
}

/// Result of a [`NodeRuntime::stop`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// This call ran the stop sequence.
    Stopped,
    /// Another call already claimed stop; nothing was done.
    AlreadyStopping,
}

/// A built node and its start/stop state.
pub struct NodeRuntime {
    graph: NodeGraph,
    start_slot: Slot,
    stop_slot: Slot,
}

impl NodeRuntime {
    pub fn new(graph: NodeGraph) -> Self {
        Self {
            graph,
            start_slot: Slot::default(),
            stop_slot: Slot::default(),
        }
    }

    /// Start the node. Only the first caller runs the sequence.
    pub async fn start(&self) -> StartOutcome {
        if !self.start_slot.claim() {
            LIFECYCLE_TRANSITIONS
                .with_label_values(&["start_ignored"])
                .inc();
            return StartOutcome::AlreadyStarted;
        }

        info!(
            network = %self.graph.config.network.network,
            node_id = %self.p2p_node_id(),
            "Starting node"
        );

        if let Err(e) = self.graph.transport.start().await {
            let err = NodeError::TransportStart(e);
            error!(error = %err, "Net adapter failed to start");
            self.graph.fatal.terminate(&err);
        }

        // Handles are dropped; lookups finish in the background.
        let seeding = self.graph.seed_coordinator.seed();
        info!(lookups = seeding.len(), "Seed lookups spawned");

        self.graph.connection_manager.start().await;

        self.start_slot.finish();
        LIFECYCLE_TRANSITIONS.with_label_values(&["start"]).inc();
        info!("Node started");
        StartOutcome::Started
    }

    /// Stop the node. Only the first caller runs the sequence.
    pub async fn stop(&self) -> StopOutcome {
        if !self.stop_slot.claim() {
            warn!("Node is already in the process of shutting down");
            LIFECYCLE_TRANSITIONS
                .with_label_values(&["stop_ignored"])
                .inc();
            return StopOutcome::AlreadyStopping;
        }

        info!("Stopping node");

        if let Err(e) = self.graph.connection_manager.stop().await {
            let err = NodeError::ConnectionManagerStop(e);
            error!(error = %err, "Error while stopping");
            SUBSYSTEM_ERRORS
                .with_label_values(&["connection_manager", "stop"])
                .inc();
        }

        if let Err(e) = self.graph.transport.stop().await {
            let err = NodeError::TransportStop(e);
            error!(error = %err, "Error while stopping");
            SUBSYSTEM_ERRORS
                .with_label_values(&["net_adapter", "stop"])
                .inc();
        }

        self.stop_slot.finish();
        LIFECYCLE_TRANSITIONS.with_label_values(&["stop"]).inc();
        info!("Node stopped");
        StopOutcome::Stopped
    }

    /// Current lifecycle state. Stop takes precedence over start.
    pub fn state(&self) -> LifecycleState {
        match (self.start_slot.load(), self.stop_slot.load()) {
            (_, DONE) => LifecycleState::Stopped,
            (_, RUNNING) => LifecycleState::Stopping,
            (DONE, _) => LifecycleState::Started,
            (RUNNING, _) => LifecycleState::Starting,
            _ => LifecycleState::NotStarted,
        }
    }

    /// This node's P2P identity.
    pub fn p2p_node_id(&self) -> PeerId {
        self.graph.transport.id()
    }

    /// The node's address book.
    pub fn address_book(&self) -> Arc<dyn AddressBook> {
        Arc::clone(&self.graph.address_book)
    }

    /// The wired collaborators.
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Start the node, wait for Ctrl-C or a shutdown request, then stop it.
    pub async fn run_until_shutdown(&self, mut shutdown: ShutdownListener) -> anyhow::Result<()> {
        self.start().await;
        info!("Node is running. Press Ctrl+C to stop.");

        let result = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                info!("Received interrupt");
                signal.context("failed to listen for interrupt signal")
            }
            _ = shutdown.wait() => {
                info!("Shutdown requested");
                Ok(())
            }
        };

        self.stop().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_claims_once() {
        let slot = Slot::default();
        assert!(slot.claim());
        assert!(!slot.claim());
        slot.finish();
        assert!(!slot.claim());
        assert_eq!(slot.load(), DONE);
    }
}
