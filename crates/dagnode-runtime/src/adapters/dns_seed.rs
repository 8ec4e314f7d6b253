//! # DNS Seeder
//!
//! Resolves a seeder host name; every A/AAAA record is a candidate peer on
//! the network's default port.
//!
//! Queries go to a subdomain that encodes the filter: `x<flags>.` for
//! non-default service bits, then `n.` for native-subnetwork nodes or
//! `n<id>.` for a specific subnetwork. An unfiltered lookup uses the bare
//! host.
//!
//! Seeders only return IPs of other nodes, so returned addresses carry the
//! requested service bits and a timestamp 3 to 7 days in the past. Addresses
//! heard through gossip then rank above seeded ones.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use dagnode_types::{NetAddress, ServiceFlags, SubnetworkId};

use crate::ports::SeedSource;

const SECS_IN_3_DAYS: u64 = 3 * 24 * 60 * 60;
const SECS_IN_4_DAYS: u64 = 4 * 24 * 60 * 60;

/// Which subnetworks the seeder should return peers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubnetworkFilter {
    /// Peers on any subnetwork.
    All,
    /// Peers on the native subnetwork.
    #[default]
    Native,
    /// Peers following one specific subnetwork.
    Subnetwork(SubnetworkId),
}

impl From<SubnetworkId> for SubnetworkFilter {
    fn from(id: SubnetworkId) -> Self {
        if id.is_native() {
            Self::Native
        } else {
            Self::Subnetwork(id)
        }
    }
}

/// Seed source backed by the system DNS resolver.
#[derive(Debug, Clone)]
pub struct DnsSeeder {
    host: String,
    default_port: u16,
    subnetwork: SubnetworkFilter,
}

impl DnsSeeder {
    /// Seeder asking for native-subnetwork peers.
    pub fn new(host: impl Into<String>, default_port: u16) -> Self {
        Self {
            host: host.into(),
            default_port,
            subnetwork: SubnetworkFilter::Native,
        }
    }

    #[must_use]
    pub fn with_subnetwork_filter(mut self, subnetwork: SubnetworkFilter) -> Self {
        self.subnetwork = subnetwork;
        self
    }

    /// Host name to resolve for peers advertising `required`.
    pub fn lookup_host_for(&self, required: ServiceFlags) -> String {
        let host = if required == ServiceFlags::NODE_NETWORK {
            self.host.clone()
        } else {
            format!("x{:x}.{}", required.bits(), self.host)
        };

        match &self.subnetwork {
            SubnetworkFilter::All => host,
            SubnetworkFilter::Native => format!("n.{host}"),
            SubnetworkFilter::Subnetwork(id) => format!("n{id}.{host}"),
        }
    }
}

#[async_trait]
impl SeedSource for DnsSeeder {
    fn kind(&self) -> &'static str {
        "dns"
    }

    fn target(&self) -> &str {
        &self.host
    }

    async fn fetch(&self, required: ServiceFlags) -> anyhow::Result<Vec<NetAddress>> {
        let host = self.lookup_host_for(required);
        debug!(host = %host, "Querying DNS seeder");

        let resolved: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), self.default_port))
            .await
            .with_context(|| format!("DNS lookup of {host} failed"))?
            .collect();

        Ok(stamp_addresses(&resolved, self.default_port, required))
    }
}

fn stamp_addresses(resolved: &[SocketAddr], port: u16, services: ServiceFlags) -> Vec<NetAddress> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let mut rng = rand::thread_rng();

    resolved
        .iter()
        .map(|addr| NetAddress {
            ip: addr.ip(),
            port,
            services,
            timestamp: now.saturating_sub(SECS_IN_3_DAYS + rng.gen_range(0..SECS_IN_4_DAYS)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_default_lookup_asks_for_native_subnetwork() {
        let seeder = DnsSeeder::new("seed.example.org", 16111);
        assert_eq!(
            seeder.lookup_host_for(ServiceFlags::NODE_NETWORK),
            "n.seed.example.org"
        );
        assert_eq!(
            seeder.lookup_host_for(ServiceFlags::from_bits(0x9)),
            "n.x9.seed.example.org"
        );
    }

    #[test]
    fn test_subnetwork_filters() {
        let subnetwork = SubnetworkId::from_bytes([0xab; 20]);
        let seeder = DnsSeeder::new("seed.example.org", 16111)
            .with_subnetwork_filter(SubnetworkFilter::from(subnetwork));
        assert_eq!(
            seeder.lookup_host_for(ServiceFlags::NODE_NETWORK),
            format!("n{}.seed.example.org", "ab".repeat(20))
        );

        let seeder = seeder.with_subnetwork_filter(SubnetworkFilter::All);
        assert_eq!(
            seeder.lookup_host_for(ServiceFlags::NODE_NETWORK),
            "seed.example.org"
        );
        assert_eq!(
            SubnetworkFilter::from(SubnetworkId::NATIVE),
            SubnetworkFilter::Native
        );
    }

    #[test]
    fn test_timestamps_are_three_to_seven_days_old() {
        let resolved = vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)), 0)];
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let stamped = stamp_addresses(&resolved, 16111, ServiceFlags::NODE_NETWORK);

        assert_eq!(stamped.len(), 1);
        assert_eq!(stamped[0].port, 16111);
        let age = now - stamped[0].timestamp;
        assert!(age >= SECS_IN_3_DAYS);
        assert!(age <= SECS_IN_3_DAYS + SECS_IN_4_DAYS + 1);
    }

    #[tokio::test]
    async fn test_ip_literal_resolves_without_network() {
        let seeder =
            DnsSeeder::new("127.0.0.1", 16211).with_subnetwork_filter(SubnetworkFilter::All);
        let addresses = seeder.fetch(ServiceFlags::NODE_NETWORK).await.unwrap();

        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].to_string(), "127.0.0.1:16211");
        assert_eq!(addresses[0].services, ServiceFlags::NODE_NETWORK);
    }
}
