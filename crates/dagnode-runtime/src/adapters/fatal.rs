//! Production fatal handler.

use tracing::error;

use crate::error::NodeError;
use crate::ports::FatalHandler;

/// Logs the fault and exits the process with status 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl FatalHandler for ProcessExit {
    fn terminate(&self, error: &NodeError) -> ! {
        error!(error = %error, "Unrecoverable error, terminating");
        eprintln!("Unrecoverable error: {error}");
        std::process::exit(1)
    }
}
