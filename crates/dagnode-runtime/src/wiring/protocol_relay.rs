//! Protocol event relay.
//!
//! The protocol manager is built before the RPC server, yet the RPC server
//! takes the protocol manager as input. The relay breaks the cycle: it is
//! handed to the protocol manager as its event sink and bound to the RPC
//! server once that exists.

use std::sync::{Arc, OnceLock};

use tracing::warn;

use dagnode_types::{BlockHash, TransactionId};

use crate::ports::{ProtocolEventSink, RpcServer};

/// Forwards protocol events to the RPC server once bound.
#[derive(Default)]
pub struct ProtocolEventRelay {
    rpc: OnceLock<Arc<dyn RpcServer>>,
}

impl ProtocolEventRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the RPC server. Only the first call has an effect.
    ///
    /// Returns `false` if a server was already bound.
    pub fn bind(&self, rpc: Arc<dyn RpcServer>) -> bool {
        self.rpc.set(rpc).is_ok()
    }

    pub fn is_bound(&self) -> bool {
        self.rpc.get().is_some()
    }
}

impl ProtocolEventSink for ProtocolEventRelay {
    fn block_added_to_dag(&self, block_hash: &BlockHash) {
        match self.rpc.get() {
            Some(rpc) => rpc.notify_block_added_to_dag(block_hash),
            None => warn!(block = %block_hash, "Block event before RPC server was bound"),
        }
    }

    fn transactions_added_to_mempool(&self, transaction_ids: &[TransactionId]) {
        match self.rpc.get() {
            Some(rpc) => rpc.notify_transactions_added_to_mempool(transaction_ids),
            None => warn!(
                count = transaction_ids.len(),
                "Mempool event before RPC server was bound"
            ),
        }
    }
}
