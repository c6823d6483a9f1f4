//! Fan-out of snapshots and event lifecycle signals
//!
//! Every subscriber owns an independent queue in a Tokio broadcast channel. A
//! subscriber that falls behind loses the oldest signals (and is told how many)
//! instead of slowing down the tick that publishes them.

use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::{Snapshot, events::Event};

use super::messages::{DeletedEvent, Signal};

/// Queue length per subscriber
pub const DEFAULT_SIGNAL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Publisher {
    tx: broadcast::Sender<Signal>,
}

impl Publisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, signal: Signal) {
        // Sending without receivers is fine, nobody is listening right now.
        match self.tx.send(signal) {
            Ok(num_receivers) => {
                trace!("published signal to {num_receivers} receivers");
            }
            Err(_) => {
                trace!("no receivers for signal");
            }
        }
    }

    pub fn snapshot(&self, snapshot: Snapshot) {
        self.publish(Signal::Snapshot(snapshot));
    }

    pub fn event_created(&self, event: Event) {
        self.publish(Signal::EventCreated(event));
    }

    pub fn event_updated(&self, event: Event) {
        self.publish(Signal::EventUpdated(event));
    }

    pub fn event_deleted(&self, id: String) {
        self.publish(Signal::EventDeleted(DeletedEvent { id }));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNAL_CAPACITY)
    }
}

/// A live feed: one full snapshot first, then every signal published after it
#[derive(Debug)]
pub struct Subscription {
    initial: Option<Snapshot>,
    rx: broadcast::Receiver<Signal>,
}

impl Subscription {
    pub fn new(initial: Snapshot, rx: broadcast::Receiver<Signal>) -> Self {
        Self {
            initial: Some(initial),
            rx,
        }
    }

    /// Next signal, or `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<Signal> {
        if let Some(snapshot) = self.initial.take() {
            return Some(Signal::Snapshot(snapshot));
        }

        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("subscriber lagged, skipped {skipped} signals");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Stop receiving. Dropping the subscription has the same effect.
    pub fn unsubscribe(self) {}
}
