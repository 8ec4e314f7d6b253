//! In-memory address book keyed by socket address.

use std::collections::HashMap;
use std::net::SocketAddr;

use parking_lot::RwLock;
use tracing::trace;

use dagnode_types::NetAddress;

use crate::ports::AddressBook;

/// Deduplicating address book held in memory.
///
/// When the same socket address is added twice the newer timestamp wins and
/// service bits are merged.
#[derive(Debug, Default)]
pub struct InMemoryAddressBook {
    entries: RwLock<HashMap<SocketAddr, NetAddress>>,
}

impl InMemoryAddressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single address.
    pub fn get(&self, addr: &SocketAddr) -> Option<NetAddress> {
        self.entries.read().get(addr).cloned()
    }

    /// Whether the socket address is known.
    pub fn contains(&self, addr: &SocketAddr) -> bool {
        self.entries.read().contains_key(addr)
    }
}

impl AddressBook for InMemoryAddressBook {
    fn add_addresses(&self, addresses: Vec<NetAddress>) {
        let mut entries = self.entries.write();
        for address in addresses {
            let key = address.socket_addr();
            match entries.get_mut(&key) {
                Some(existing) => {
                    existing.services = existing.services | address.services;
                    existing.timestamp = existing.timestamp.max(address.timestamp);
                }
                None => {
                    trace!(address = %key, "New address");
                    entries.insert(key, address);
                }
            }
        }
    }

    fn addresses(&self) -> Vec<NetAddress> {
        self.entries.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagnode_types::ServiceFlags;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr(last_octet: u8, services: ServiceFlags, timestamp: u64) -> NetAddress {
        NetAddress {
            ip: IpAddr::V4(Ipv4Addr::new(192, 168, 0, last_octet)),
            port: 16111,
            services,
            timestamp,
        }
    }

    #[test]
    fn test_duplicates_are_merged() {
        let book = InMemoryAddressBook::new();
        book.add_addresses(vec![
            addr(1, ServiceFlags::NONE, 100),
            addr(1, ServiceFlags::NODE_NETWORK, 50),
            addr(2, ServiceFlags::NODE_NETWORK, 10),
        ]);

        assert_eq!(book.len(), 2);
        let merged = book.get(&addr(1, ServiceFlags::NONE, 0).socket_addr()).unwrap();
        assert_eq!(merged.timestamp, 100);
        assert!(merged.services.contains(ServiceFlags::NODE_NETWORK));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let book = InMemoryAddressBook::new();
        book.add_addresses(Vec::new());
        assert!(book.is_empty());
    }
}
