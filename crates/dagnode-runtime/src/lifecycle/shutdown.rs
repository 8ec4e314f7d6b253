//! Process shutdown requests.
//!
//! The RPC server holds a [`ShutdownRequester`] so clients can ask the node
//! to stop. The run loop holds the matching [`ShutdownListener`].

use std::sync::Arc;

use tokio::sync::watch;

/// Create a connected requester/listener pair.
pub fn shutdown_channel() -> (ShutdownRequester, ShutdownListener) {
    let (tx, rx) = watch::channel(false);
    (
        ShutdownRequester { tx: Arc::new(tx) },
        ShutdownListener { rx },
    )
}

/// Asks the node to shut down. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownRequester {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownRequester {
    /// Request shutdown. Repeated requests are no-ops.
    pub fn request(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Waits for a shutdown request.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown has been requested.
    ///
    /// If every requester is dropped without requesting, this never resolves.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
