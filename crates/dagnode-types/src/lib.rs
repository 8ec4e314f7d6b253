//! # DAG Node Types
//!
//! Value types exchanged between the node runtime and the subsystems it
//! wires together.
//!
//! ## Clusters
//!
//! - **Identifiers**: `BlockHash`, `TransactionId`, `SubnetworkId`, `PeerId`
//! - **Networking**: `NetAddress`, `ServiceFlags`, `Network`, `NetworkParams`
//! - **Consensus events**: `DagNotification`
//!
//! Nothing in here performs I/O. Types are cheap to clone and safe to share
//! across threads.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod hash;
pub mod network;
pub mod notification;

pub use hash::{BlockHash, ParseIdError, SubnetworkId, TransactionId};
pub use network::{NetAddress, Network, NetworkParams, PeerId, ServiceFlags};
pub use notification::{DagNotification, NotificationKind};
