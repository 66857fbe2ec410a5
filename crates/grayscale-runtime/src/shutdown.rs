//! Shutdown signalling for channel pump tasks

use tokio::sync::watch;

/// Owner side of a connection's shutdown signal
///
/// One handle exists per live connection. Triggering it tells every pump
/// spawned for that connection to stop reading its inbound queue.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Trigger shutdown; returns `true` only for the first trigger
    pub fn trigger(&self) -> bool {
        let first = self.sender.send_if_modified(|triggered| {
            let was = *triggered;
            *triggered = true;
            !was
        });
        if first {
            tracing::debug!("Shutdown triggered");
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Get a signal for a pump task
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side handed to each pump
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once shutdown is triggered or the handle is dropped
    ///
    /// Returns immediately if already triggered. Cancel safe, so it can sit in
    /// a `select!` loop.
    pub async fn wait(&mut self) {
        let _ = self.receiver.wait_for(|triggered| *triggered).await;
    }
}
