//! Broadcast channels announcing completed batches.

use tokio::sync::broadcast;

use crate::outcome::{OperationReport, Outcome};

/// Default buffer size of each event channel.
pub const EVENT_CHANNEL_SIZE: usize = 100;

/// Publish/subscribe hub for batch results.
///
/// Cloning yields a handle onto the same channels, so one instance can be
/// shared between the orchestrator and any number of listeners.
#[derive(Debug, Clone)]
pub struct ActionEvents {
    copied_tx: broadcast::Sender<Vec<Outcome>>,
    moved_tx: broadcast::Sender<OperationReport>,
}

impl ActionEvents {
    /// Create channels buffering up to `capacity` events each.
    pub fn new(capacity: usize) -> Self {
        let (copied_tx, _) = broadcast::channel(capacity);
        let (moved_tx, _) = broadcast::channel(capacity);
        Self {
            copied_tx,
            moved_tx,
        }
    }

    /// Subscribe to raw outcomes of copy batches.
    pub fn subscribe_copied(&self) -> broadcast::Receiver<Vec<Outcome>> {
        self.copied_tx.subscribe()
    }

    /// Subscribe to classified reports of move batches.
    pub fn subscribe_moved(&self) -> broadcast::Receiver<OperationReport> {
        self.moved_tx.subscribe()
    }

    /// Announce a finished copy batch. Returns the number of listeners reached.
    pub fn publish_copied(&self, outcomes: Vec<Outcome>) -> usize {
        self.copied_tx.send(outcomes).unwrap_or(0)
    }

    /// Announce a finished move batch. Returns the number of listeners reached.
    pub fn publish_moved(&self, report: OperationReport) -> usize {
        self.moved_tx.send(report).unwrap_or(0)
    }
}

impl Default for ActionEvents {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_SIZE)
    }
}
