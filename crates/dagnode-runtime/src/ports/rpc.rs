//! RPC and protocol collaborators.

use dagnode_types::{BlockHash, TransactionId};

/// The P2P protocol state machine.
pub trait ProtocolManager: Send + Sync {}

/// Events the protocol manager emits while handling peers.
///
/// Handed to the protocol manager at construction.
pub trait ProtocolEventSink: Send + Sync {
    /// A block relayed by a peer was added to the DAG.
    fn block_added_to_dag(&self, block_hash: &BlockHash);

    /// Transactions relayed by a peer were accepted into the mempool.
    fn transactions_added_to_mempool(&self, transaction_ids: &[TransactionId]);
}

/// Notification surface of the RPC server.
pub trait RpcServer: Send + Sync {
    fn notify_block_added_to_dag(&self, block_hash: &BlockHash);

    fn notify_transactions_added_to_mempool(&self, transaction_ids: &[TransactionId]);

    /// Push a selected-chain change to subscribed RPC clients.
    fn notify_chain_changed(
        &self,
        removed_chain_block_hashes: &[BlockHash],
        added_chain_block_hashes: &[BlockHash],
    ) -> anyhow::Result<()>;

    /// Push a finality conflict. The hash is passed in its hex form.
    fn notify_finality_conflict(&self, violating_block_hash: &str) -> anyhow::Result<()>;

    /// Push a finality conflict resolution. The hash is passed in its hex form.
    fn notify_finality_conflict_resolved(&self, finality_block_hash: &str) -> anyhow::Result<()>;
}
