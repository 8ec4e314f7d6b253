//! # Node Errors
//!
//! | Variant | Raised by | Policy |
//! |---------|-----------|--------|
//! | `Build` | `NodeBuilder::build` | returned to caller, node never starts |
//! | `TransportStart` | `NodeRuntime::start` | fatal |
//! | `TransportStop`, `ConnectionManagerStop` | `NodeRuntime::stop` | logged, shutdown continues |
//! | `NotificationForward` | notification bridge | fatal |
//! | `Seed` | seed coordinator | logged |
//! | `Config` | `NodeConfig::load` | returned to caller |

use std::fmt;

use dagnode_types::NotificationKind;
use thiserror::Error;

use crate::container::ConfigError;

/// Construction stage of the node graph, in build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
    AcceptanceIndex,
    IndexManager,
    Dag,
    Mempool,
    Transport,
    AddressBook,
    ConnectionManager,
    ProtocolManager,
    RpcServer,
    SeedSources,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AcceptanceIndex => "acceptance index",
            Self::IndexManager => "index manager",
            Self::Dag => "DAG",
            Self::Mempool => "mempool",
            Self::Transport => "net adapter",
            Self::AddressBook => "address manager",
            Self::ConnectionManager => "connection manager",
            Self::ProtocolManager => "protocol manager",
            Self::RpcServer => "RPC server",
            Self::SeedSources => "seed sources",
        };
        f.write_str(name)
    }
}

/// Errors produced by the node runtime.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("failed to build {stage}: {source}")]
    Build {
        stage: BuildStage,
        #[source]
        source: anyhow::Error,
    },

    #[error("error starting the net adapter: {0}")]
    TransportStart(#[source] anyhow::Error),

    #[error("error stopping the net adapter: {0}")]
    TransportStop(#[source] anyhow::Error),

    #[error("error stopping the connection manager: {0}")]
    ConnectionManagerStop(#[source] anyhow::Error),

    #[error("failed to forward {} notification to RPC: {source}", .kind.as_str())]
    NotificationForward {
        kind: NotificationKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("seeding from {source_name} failed: {source}")]
    Seed {
        source_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Attach a build stage to a collaborator constructor result.
pub(crate) trait BuildResultExt<T> {
    fn stage(self, stage: BuildStage) -> Result<T, NodeError>;
}

impl<T> BuildResultExt<T> for anyhow::Result<T> {
    fn stage(self, stage: BuildStage) -> Result<T, NodeError> {
        self.map_err(|source| NodeError::Build { stage, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_names_stage() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("port in use"));
        let err = result.stage(BuildStage::Transport).unwrap_err();

        assert!(matches!(
            err,
            NodeError::Build {
                stage: BuildStage::Transport,
                ..
            }
        ));
        assert_eq!(err.to_string(), "failed to build net adapter: port in use");
    }

    #[test]
    fn test_forward_error_names_kind() {
        let err = NodeError::NotificationForward {
            kind: NotificationKind::FinalityConflict,
            source: anyhow::anyhow!("sink closed"),
        };
        assert_eq!(
            err.to_string(),
            "failed to forward finality_conflict notification to RPC: sink closed"
        );
    }
}
