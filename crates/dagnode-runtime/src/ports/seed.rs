//! Seed sources for bootstrapping the address book.

use async_trait::async_trait;
use dagnode_types::{NetAddress, ServiceFlags};

/// A remote service that returns candidate peers.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Label used in logs and metrics (`dns`, `grpc`).
    fn kind(&self) -> &'static str;

    /// Where the lookup goes (host name or endpoint).
    fn target(&self) -> &str;

    /// Ask for peers advertising at least `required` services.
    async fn fetch(&self, required: ServiceFlags) -> anyhow::Result<Vec<NetAddress>>;
}
