//! # DAG Node Runtime
//!
//! Composition root and lifecycle controller of a blockDAG full node.
//!
//! The runtime owns no consensus, networking or RPC logic. It builds those
//! collaborators through a [`ComponentFactory`], wires them together, and
//! starts and stops them.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the dependency builder
//! - `wiring/` - DAG notification bridge and protocol event relay
//! - `seeding/` - DNS/GRPC address book bootstrap
//! - `lifecycle/` - exactly-once start/stop and the run loop
//! - `ports/` - traits the collaborators implement
//! - `adapters/` - built-in port implementations
//!
//! ## Startup Sequence
//!
//! ```text
//! NodeConfig::load ──► NodeBuilder::build ──► NodeRuntime::new
//!                                                  │
//!                              run_until_shutdown ─┤
//!                                                  ├─ start: transport, seeding, conn mgr
//!                                                  ├─ wait:  Ctrl-C or RPC shutdown request
//!                                                  └─ stop:  conn mgr, transport
//! ```
//!
//! [`ComponentFactory`]: ports::ComponentFactory

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod container;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod seeding;
pub mod wiring;

pub use container::{ConfigError, NodeBuilder, NodeConfig, NodeGraph};
pub use error::{BuildStage, NodeError};
pub use lifecycle::{
    shutdown_channel, LifecycleState, NodeRuntime, ShutdownListener, ShutdownRequester,
    StartOutcome, StopOutcome,
};
pub use seeding::SeedCoordinator;
