//! # Seed Coordinator
//!
//! Best-effort bootstrap of the address book. Every configured seed source
//! is queried once per node start, concurrently, asking for full nodes.
//! Results are merged into the address book as they arrive.
//!
//! A failed lookup is logged and counted. It is never retried and never
//! stops the node: the connection manager can still use addresses learned
//! from peers or from `connect_peers`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use dagnode_telemetry::{SEED_ADDRESSES, SEED_FAILURES};
use dagnode_types::ServiceFlags;

use crate::error::NodeError;
use crate::ports::{AddressBook, SeedSource};

/// Services a seeded peer must advertise.
pub const REQUIRED_SERVICES: ServiceFlags = ServiceFlags::NODE_NETWORK;

/// Fans seed lookups out and merges the results.
pub struct SeedCoordinator {
    sources: Vec<Arc<dyn SeedSource>>,
    address_book: Arc<dyn AddressBook>,
}

impl SeedCoordinator {
    pub fn new(sources: Vec<Arc<dyn SeedSource>>, address_book: Arc<dyn AddressBook>) -> Self {
        Self {
            sources,
            address_book,
        }
    }

    /// Configured sources, in the order they were built.
    pub fn sources(&self) -> &[Arc<dyn SeedSource>] {
        &self.sources
    }

    /// Spawn one lookup task per source and return immediately.
    ///
    /// Callers may drop the handles; the tasks run to completion on their own.
    /// Must be called from within a tokio runtime.
    pub fn seed(&self) -> Vec<JoinHandle<()>> {
        if self.sources.is_empty() {
            debug!("No seed sources configured");
            return Vec::new();
        }

        info!(sources = self.sources.len(), "Seeding address book");

        self.sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let book = Arc::clone(&self.address_book);
                tokio::spawn(async move {
                    if let Err(e) = seed_from(source.as_ref(), book.as_ref()).await {
                        warn!(error = %e, "Seed lookup failed");
                    }
                })
            })
            .collect()
    }
}

/// Query one source and merge its answer. Returns the number of addresses
/// handed to the book.
async fn seed_from(source: &dyn SeedSource, book: &dyn AddressBook) -> Result<usize, NodeError> {
    let label = source.kind();
    let addresses = source.fetch(REQUIRED_SERVICES).await.map_err(|e| {
        SEED_FAILURES.with_label_values(&[label]).inc();
        NodeError::Seed {
            source_name: format!("{label} seeder {}", source.target()),
            source: e,
        }
    })?;

    let count = addresses.len();
    SEED_ADDRESSES
        .with_label_values(&[label])
        .inc_by(count as u64);
    info!(
        source = label,
        target = source.target(),
        count,
        "Retrieved addresses from seeder"
    );

    if count > 0 {
        book.add_addresses(addresses);
    }
    Ok(count)
}
