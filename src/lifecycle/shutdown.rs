//! Shutdown coordination for background tasks.

use tokio::sync::broadcast;

/// Stop signal shared by the router's background loops.
///
/// The health monitor and stats reporter each hold a receiver; one
/// `trigger` stops them all. Late subscribers after a trigger simply
/// never receive the signal, so subscribe before spawning the loop.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one background loop. Call once per spawned task.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscribed loop to exit after its current iteration.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of loops still holding a receiver.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
