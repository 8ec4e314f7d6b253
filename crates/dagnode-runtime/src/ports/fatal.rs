//! Process termination on unrecoverable faults.

use crate::error::NodeError;

/// Called when the node cannot continue safely.
///
/// Production code uses [`crate::adapters::ProcessExit`]; tests inject a
/// handler that panics so the fault can be observed.
pub trait FatalHandler: Send + Sync {
    fn terminate(&self, error: &NodeError) -> !;
}
