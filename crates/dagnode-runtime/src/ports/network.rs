//! Network-facing collaborators.

use async_trait::async_trait;
use dagnode_types::{NetAddress, PeerId};

/// The P2P transport (listener and dialer).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open listeners and make the transport ready to dial.
    async fn start(&self) -> anyhow::Result<()>;

    /// Close listeners and release sockets.
    async fn stop(&self) -> anyhow::Result<()>;

    /// This node's identity on the network.
    fn id(&self) -> PeerId;
}

/// Drives outbound dialing and inbound accepting over the transport.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Begin dialing and accepting.
    async fn start(&self);

    /// Stop dialing and accepting. Errors are reported, never retried.
    async fn stop(&self) -> anyhow::Result<()>;
}

/// Store of known peer addresses.
///
/// Implementations must be safe to mutate concurrently: seeders and the
/// connection manager's own discovery write to it at the same time.
pub trait AddressBook: Send + Sync {
    /// Merge a batch of candidate addresses. Duplicates are the book's concern.
    fn add_addresses(&self, addresses: Vec<NetAddress>);

    /// Snapshot of every known address.
    fn addresses(&self) -> Vec<NetAddress>;

    /// Number of known addresses.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
