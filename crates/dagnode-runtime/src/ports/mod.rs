//! # Collaborator Ports
//!
//! The runtime owns no networking, consensus or RPC logic. Each collaborator
//! is reached through one of the traits below and constructed by a
//! [`ComponentFactory`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      NodeRuntime                              │
//! │   start/stop ──► Transport, ConnectionManager                 │
//! │   seeding    ──► SeedSource ──► AddressBook                   │
//! │   bridge     ◄── BlockDag ──► RpcServer                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ports that do I/O on the lifecycle path are async; notification sinks are
//! sync because they run on the DAG's dispatch thread and must not block.

pub mod consensus;
pub mod factory;
pub mod fatal;
pub mod network;
pub mod rpc;
pub mod seed;

pub use consensus::*;
pub use factory::*;
pub use fatal::*;
pub use network::*;
pub use rpc::*;
pub use seed::*;
