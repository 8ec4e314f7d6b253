//! # Node Configuration
//!
//! Every knob the composition root reads while building the node graph.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file passed to [`NodeConfig::load`]
//! 3. `DAGNODE_*` environment variables
//!
//! Unknown TOML keys are rejected so typos surface at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use dagnode_telemetry::TelemetryConfig;
use dagnode_types::{Network, SubnetworkId};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Largest orphan transaction the mempool will hold, in bytes.
pub const DEFAULT_MAX_ORPHAN_TX_SIZE: usize = 100_000;

/// Highest transaction version the mempool accepts.
pub const MAX_TX_VERSION: u16 = 1;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// P2P network and seeding.
    pub network: NetworkConfig,
    /// Optional indexes.
    pub index: IndexConfig,
    /// DAG engine.
    pub dag: DagConfig,
    /// Mempool policy.
    pub mempool: MempoolConfig,
    /// Block template policy.
    pub mining: MiningConfig,
    /// RPC server.
    pub rpc: RpcConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Which network to join.
    pub network: Network,
    /// P2P listen addresses. Empty means all interfaces on the default port.
    pub listen: Vec<SocketAddr>,
    /// Peers to connect to permanently.
    pub connect_peers: Vec<String>,
    /// Outbound connection target.
    pub target_outbound: usize,
    /// Inbound connection cap.
    pub max_inbound: usize,
    /// Skip DNS seeding entirely.
    pub disable_dns_seed: bool,
    /// Replaces the network's DNS seed list with a single host.
    pub dns_seed: Option<String>,
    /// GRPC seeder endpoint (`host:port`).
    pub grpc_seed: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            listen: Vec::new(),
            connect_peers: Vec::new(),
            target_outbound: 8,
            max_inbound: 117,
            disable_dns_seed: false,
            dns_seed: None,
            grpc_seed: None,
        }
    }
}

/// Index configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Maintain the acceptance index. Required for chain-changed RPC
    /// notifications.
    pub acceptance_index: bool,
}

/// DAG engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DagConfig {
    /// UTXO cache budget in bytes.
    pub max_utxo_cache_size: u64,
    /// Subnetwork this node follows.
    pub subnetwork_id: SubnetworkId,
    /// Signature cache entries.
    pub sig_cache_max_size: usize,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            max_utxo_cache_size: 5_000_000_000,
            subnetwork_id: SubnetworkId::NATIVE,
            sig_cache_max_size: 100_000,
        }
    }
}

/// Mempool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MempoolConfig {
    /// Relay non-standard transactions.
    pub relay_non_std: bool,
    /// Orphan pool capacity.
    pub max_orphan_txs: usize,
    /// Minimum relay fee in sompi per kilobyte.
    pub min_relay_tx_fee: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            relay_non_std: false,
            max_orphan_txs: 100,
            min_relay_tx_fee: 1000,
        }
    }
}

/// Mining configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MiningConfig {
    /// Mass limit of generated block templates.
    pub block_max_mass: u64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            block_max_mass: 10_000_000,
        }
    }
}

/// RPC server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
    /// RPC listen addresses.
    pub listen: Vec<SocketAddr>,
    /// Concurrent client cap.
    pub max_clients: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen: Vec::new(),
            max_clients: 10,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl NodeConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded config file");
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `DAGNODE_*` overrides using `lookup` to read variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DAGNODE_NETWORK") {
            match value.parse() {
                Ok(network) => self.network.network = network,
                Err(e) => warn!(value = %value, error = %e, "Ignoring DAGNODE_NETWORK"),
            }
        }
        if let Some(host) = lookup("DAGNODE_DNS_SEED") {
            self.network.dns_seed = Some(host).filter(|h| !h.is_empty());
        }
        if let Some(endpoint) = lookup("DAGNODE_GRPC_SEED") {
            self.network.grpc_seed = Some(endpoint).filter(|e| !e.is_empty());
        }
        if let Some(value) = lookup("DAGNODE_DISABLE_DNS_SEED") {
            match parse_bool(&value) {
                Some(flag) => self.network.disable_dns_seed = flag,
                None => warn!(value = %value, "Ignoring DAGNODE_DISABLE_DNS_SEED"),
            }
        }
        if let Some(value) = lookup("DAGNODE_ACCEPTANCE_INDEX") {
            match parse_bool(&value) {
                Some(flag) => self.index.acceptance_index = flag,
                None => warn!(value = %value, "Ignoring DAGNODE_ACCEPTANCE_INDEX"),
            }
        }
        if let Some(level) = lookup("DAGNODE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = lookup("DAGNODE_JSON_LOGS") {
            match parse_bool(&value) {
                Some(flag) => self.logging.json = flag,
                None => warn!(value = %value, "Ignoring DAGNODE_JSON_LOGS"),
            }
        }
        if let Some(value) = lookup("DAGNODE_LISTEN") {
            let parsed: Result<Vec<SocketAddr>, _> = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match parsed {
                Ok(listen) => self.network.listen = listen,
                Err(e) => warn!(value = %value, error = %e, "Ignoring DAGNODE_LISTEN"),
            }
        }
    }

    /// Reject values no collaborator could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dag.sig_cache_max_size == 0 {
            return Err(ConfigError::Invalid(
                "dag.sig_cache_max_size must be greater than zero".to_string(),
            ));
        }
        if self.mining.block_max_mass == 0 {
            return Err(ConfigError::Invalid(
                "mining.block_max_mass must be greater than zero".to_string(),
            ));
        }
        if self.network.target_outbound == 0 && self.network.connect_peers.is_empty() {
            warn!("network.target_outbound is zero and no connect_peers are set, node will only accept inbound peers");
        }
        if self.network.disable_dns_seed && self.network.dns_seed.is_some() {
            warn!("network.dns_seed is set but DNS seeding is disabled");
        }
        Ok(())
    }

    /// Logging settings for `dagnode_telemetry::init_telemetry`.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.logging.level.clone(),
            json_logs: self.logging.json,
            ..TelemetryConfig::default()
        }
    }

    /// DNS seed hosts to query: the override if set, otherwise the network's
    /// list. Empty when DNS seeding is disabled.
    #[must_use]
    pub fn dns_seed_hosts(&self) -> Vec<String> {
        if self.network.disable_dns_seed {
            return Vec::new();
        }
        match &self.network.dns_seed {
            Some(host) => vec![host.clone()],
            None => self
                .network
                .network
                .params()
                .dns_seeds
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
