//! # Node Container
//!
//! Configuration and the dependency builder that turns it into a wired
//! [`NodeGraph`].

pub mod builder;
pub mod config;

pub use builder::{NodeBuilder, NodeGraph};
pub use config::{
    ConfigError, DagConfig, IndexConfig, LoggingConfig, MempoolConfig, MiningConfig,
    NetworkConfig, NodeConfig, RpcConfig, DEFAULT_MAX_ORPHAN_TX_SIZE, MAX_TX_VERSION,
};
