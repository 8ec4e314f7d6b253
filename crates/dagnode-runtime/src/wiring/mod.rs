//! # Cross-Component Wiring
//!
//! The node has two event paths that do not follow construction order:
//!
//! ```text
//! BlockDag ──(DagNotification)──► NotificationBridge ──► RpcServer
//! ProtocolManager ──(ProtocolEventSink)──► ProtocolEventRelay ──► RpcServer
//! ```
//!
//! Both are set up by the builder after the RPC server exists and before the
//! graph is handed out.

pub mod notification_bridge;
pub mod protocol_relay;

pub use notification_bridge::{Delivery, NotificationBridge};
pub use protocol_relay::ProtocolEventRelay;
