//! # Notification Bridge
//!
//! Translates DAG notifications into RPC notifications.
//!
//! | Notification | Action |
//! |--------------|--------|
//! | `ChainChanged` | forwarded in order, only with the acceptance index |
//! | `FinalityConflict` | violating hash forwarded as hex |
//! | `FinalityConflictResolved` | finality hash forwarded as hex |
//! | anything else | ignored |
//!
//! A forwarding failure means RPC clients would silently miss consensus
//! state, so it is fatal.

use std::sync::Arc;

use tracing::{debug, error};

use dagnode_telemetry::DAG_NOTIFICATIONS;
use dagnode_types::{DagNotification, NotificationKind};

use crate::error::NodeError;
use crate::ports::{BlockDag, FatalHandler, RpcServer};

/// What the bridge did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the RPC server.
    Forwarded,
    /// Recognised but not applicable to this node.
    Skipped,
    /// Not a notification the RPC layer cares about.
    Ignored,
}

impl Delivery {
    fn as_str(self) -> &'static str {
        match self {
            Self::Forwarded => "forwarded",
            Self::Skipped => "skipped",
            Self::Ignored => "ignored",
        }
    }
}

/// The DAG's single RPC-facing subscriber.
pub struct NotificationBridge {
    rpc: Arc<dyn RpcServer>,
    acceptance_index_enabled: bool,
    fatal: Arc<dyn FatalHandler>,
}

impl NotificationBridge {
    pub fn new(
        rpc: Arc<dyn RpcServer>,
        acceptance_index_enabled: bool,
        fatal: Arc<dyn FatalHandler>,
    ) -> Self {
        Self {
            rpc,
            acceptance_index_enabled,
            fatal,
        }
    }

    /// Subscribe the bridge to `dag`. Call once per engine.
    pub fn register(self: Arc<Self>, dag: &dyn BlockDag) {
        dag.subscribe(Box::new(move |notification: &DagNotification| {
            self.on_notification(notification);
        }));
        debug!("Notification bridge subscribed to DAG");
    }

    /// Entry point used by the DAG subscription. Never returns on a
    /// forwarding failure.
    pub fn on_notification(&self, notification: &DagNotification) {
        if let Err(e) = self.handle(notification) {
            error!(error = %e, "Failed to forward DAG notification");
            self.fatal.terminate(&e);
        }
    }

    /// Route one notification.
    pub fn handle(&self, notification: &DagNotification) -> Result<Delivery, NodeError> {
        let kind = notification.kind();

        let delivery = match notification {
            DagNotification::ChainChanged {
                removed_chain_block_hashes,
                added_chain_block_hashes,
            } => {
                if self.acceptance_index_enabled {
                    self.rpc
                        .notify_chain_changed(removed_chain_block_hashes, added_chain_block_hashes)
                        .map_err(|source| forward_error(kind, source))?;
                    Delivery::Forwarded
                } else {
                    Delivery::Skipped
                }
            }
            DagNotification::FinalityConflict {
                violating_block_hash,
            } => {
                self.rpc
                    .notify_finality_conflict(&violating_block_hash.to_string())
                    .map_err(|source| forward_error(kind, source))?;
                Delivery::Forwarded
            }
            DagNotification::FinalityConflictResolved {
                finality_block_hash,
            } => {
                self.rpc
                    .notify_finality_conflict_resolved(&finality_block_hash.to_string())
                    .map_err(|source| forward_error(kind, source))?;
                Delivery::Forwarded
            }
            _ => Delivery::Ignored,
        };

        DAG_NOTIFICATIONS
            .with_label_values(&[kind.as_str(), delivery.as_str()])
            .inc();
        Ok(delivery)
    }
}

fn forward_error(kind: NotificationKind, source: anyhow::Error) -> NodeError {
    DAG_NOTIFICATIONS
        .with_label_values(&[kind.as_str(), "failed"])
        .inc();
    NodeError::NotificationForward { kind, source }
}
