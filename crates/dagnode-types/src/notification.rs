//! # DAG Notifications
//!
//! Events the consensus engine publishes to its subscribers. Each value is
//! produced once on the engine's dispatch thread and consumed once per
//! subscriber; nothing here is persisted.
//!
//! The enum is `#[non_exhaustive]`: the engine may grow new event kinds, and
//! subscribers outside this crate must handle them with a catch-all arm.

use crate::hash::BlockHash;

/// A notification emitted by the DAG consensus engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DagNotification {
    /// A block was added to the DAG.
    BlockAdded {
        /// Hash of the new block.
        block_hash: BlockHash,
    },

    /// The selected parent chain changed.
    ChainChanged {
        /// Blocks removed from the selected chain, in removal order.
        removed_chain_block_hashes: Vec<BlockHash>,
        /// Blocks added to the selected chain, in addition order.
        added_chain_block_hashes: Vec<BlockHash>,
    },

    /// A block violated the finality guarantee.
    FinalityConflict {
        /// The offending block.
        violating_block_hash: BlockHash,
    },

    /// A previously reported finality conflict was resolved.
    FinalityConflictResolved {
        /// The block chosen as finality point by the resolution.
        finality_block_hash: BlockHash,
    },
}

/// Discriminant of a `DagNotification`, used for logging and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    BlockAdded,
    ChainChanged,
    FinalityConflict,
    FinalityConflictResolved,
}

impl NotificationKind {
    /// Stable label for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BlockAdded => "block_added",
            Self::ChainChanged => "chain_changed",
            Self::FinalityConflict => "finality_conflict",
            Self::FinalityConflictResolved => "finality_conflict_resolved",
        }
    }
}

impl DagNotification {
    /// The kind of this notification.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::BlockAdded { .. } => NotificationKind::BlockAdded,
            Self::ChainChanged { .. } => NotificationKind::ChainChanged,
            Self::FinalityConflict { .. } => NotificationKind::FinalityConflict,
            Self::FinalityConflictResolved { .. } => NotificationKind::FinalityConflictResolved,
        }
    }
}
