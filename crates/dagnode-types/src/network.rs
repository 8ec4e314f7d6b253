//! # Networking Types
//!
//! Peer addresses, advertised service bits and the per-network parameters the
//! node needs before it can reach anyone (default port, DNS seeds).

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Service bits a peer advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ServiceFlags(u64);

impl ServiceFlags {
    /// No services.
    pub const NONE: Self = Self(0);
    /// The peer is a full node serving the whole DAG.
    pub const NODE_NETWORK: Self = Self(1);

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Build from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ServiceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A candidate peer address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetAddress {
    /// IP address of the peer.
    pub ip: IpAddr,
    /// P2P port of the peer.
    pub port: u16,
    /// Services the peer is believed to offer.
    pub services: ServiceFlags,
    /// Unix timestamp (seconds) of when the address was last seen.
    pub timestamp: u64,
}

impl NetAddress {
    /// Create an address with no timestamp information.
    #[must_use]
    pub fn new(ip: IpAddr, port: u16, services: ServiceFlags) -> Self {
        Self {
            ip,
            port,
            services,
            timestamp: 0,
        }
    }

    /// Socket address used for dialing and for deduplication.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl fmt::Display for NetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Identity of this node on the P2P network.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId([u8; 16]);

impl PeerId {
    /// Wrap raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random identity.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

/// The network a node participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
    /// Developer network.
    Devnet,
    /// Local simulation network. Has no seeders.
    Simnet,
}

impl Network {
    /// Static parameters for this network.
    #[must_use]
    pub fn params(&self) -> NetworkParams {
        match self {
            Self::Mainnet => NetworkParams {
                name: "kaspa-mainnet",
                default_port: 16111,
                dns_seeds: &["mainnet-dnsseed.daglabs-dev.com"],
            },
            Self::Testnet => NetworkParams {
                name: "kaspa-testnet",
                default_port: 16211,
                dns_seeds: &["testnet-dnsseed.daglabs-dev.com"],
            },
            Self::Devnet => NetworkParams {
                name: "kaspa-devnet",
                default_port: 16611,
                dns_seeds: &["devnet-dnsseed.daglabs-dev.com"],
            },
            Self::Simnet => NetworkParams {
                name: "kaspa-simnet",
                default_port: 16511,
                dns_seeds: &[],
            },
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Simnet => "simnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "simnet" => Ok(Self::Simnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

/// Static per-network parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// Human readable network name.
    pub name: &'static str,
    /// P2P port peers listen on by default.
    pub default_port: u16,
    /// DNS seeders queried at startup.
    pub dns_seeds: &'static [&'static str],
}
