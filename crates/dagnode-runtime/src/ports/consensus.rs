//! Consensus-side collaborators: the DAG engine, its indexes, the mempool
//! and the caches they share.

use dagnode_types::DagNotification;

/// Callback invoked by the DAG for every notification, one at a time.
pub type NotificationCallback = Box<dyn Fn(&DagNotification) + Send + Sync>;

/// The DAG consensus engine.
pub trait BlockDag: Send + Sync {
    /// Register a subscriber for the lifetime of the engine.
    ///
    /// The engine delivers notifications to each subscriber serially from its
    /// own dispatch context.
    fn subscribe(&self, callback: NotificationCallback);
}

/// Clock used by the DAG for median-time and timestamp checks.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Cache of verified signatures shared by the DAG and the mempool.
pub trait SigCache: Send + Sync {
    /// Maximum number of entries held.
    fn capacity(&self) -> usize;
}

/// Optional index of which blocks were accepted by the selected chain.
pub trait AcceptanceIndex: Send + Sync {}

/// Drives optional indexes as the DAG connects blocks.
pub trait IndexManager: Send + Sync {}

/// Pool of unconfirmed transactions.
pub trait Mempool: Send + Sync {
    /// Number of transactions currently held.
    fn count(&self) -> usize;
}

/// Builds block templates for miners out of mempool contents.
pub trait BlockTemplateGenerator: Send + Sync {}
