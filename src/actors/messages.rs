//! Message types for actor communication
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages sent to the monitor actor via mpsc
//! 2. **Signals**: Broadcast notifications published to every subscriber
//! 3. **Immutability**: All signals are cloneable for multi-subscriber patterns

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot};

use crate::{
    Snapshot,
    alerts::Alert,
    error::MonitorResult,
    events::{Event, EventPatch, NewEvent},
};

/// Signal pushed to subscribers
///
/// Serialized as `{"type": ..., "data": ...}`. The broadcast channel may lag or
/// drop messages for slow subscribers; nothing is replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Signal {
    /// A freshly generated snapshot
    #[serde(rename = "monitoring_update")]
    Snapshot(Snapshot),

    EventCreated(Event),

    EventUpdated(Event),

    EventDeleted(DeletedEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedEvent {
    pub id: String,
}

/// Counters over the current alert and event state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Alerts in the recent-alert history
    pub alerts: usize,

    /// Critical alerts in the recent-alert history
    pub critical_alerts: usize,

    /// Events in the store
    pub events: usize,

    /// Monitored hosts
    pub hosts: usize,

    /// Currently connected subscribers
    pub subscribers: usize,
}

/// Commands that can be sent to the MonitorActor
///
/// Each command runs to completion before the next one is taken, so every
/// read-modify-write on the alert log and event store is exclusive.
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run one full sampling pass (appends alerts and events)
    GenerateSnapshot {
        respond_to: oneshot::Sender<Snapshot>,
    },

    /// Return the last generated snapshot without sampling
    Peek {
        respond_to: oneshot::Sender<Option<Snapshot>>,
    },

    /// Peek, falling back to a fresh pass if nothing was generated yet
    CurrentSnapshot {
        respond_to: oneshot::Sender<Snapshot>,
    },

    ListAlerts {
        limit: Option<usize>,
        respond_to: oneshot::Sender<Vec<Alert>>,
    },

    ListEvents {
        respond_to: oneshot::Sender<Vec<Event>>,
    },

    GetEvent {
        id: String,
        respond_to: oneshot::Sender<Option<Event>>,
    },

    CreateEvent {
        event: NewEvent,
        respond_to: oneshot::Sender<Event>,
    },

    UpdateEvent {
        id: String,
        patch: EventPatch,
        respond_to: oneshot::Sender<MonitorResult<Event>>,
    },

    /// Idempotent, absent ids are not an error
    DeleteEvent {
        id: String,
        respond_to: oneshot::Sender<()>,
    },

    GetStats {
        respond_to: oneshot::Sender<MonitorStats>,
    },

    /// Register a subscriber together with the snapshot it starts from
    Subscribe {
        respond_to: oneshot::Sender<(Snapshot, broadcast::Receiver<Signal>)>,
    },

    /// Update the background tick interval
    ///
    /// The new interval takes effect immediately, the next tick is one full
    /// interval away.
    UpdateInterval { interval_secs: u64 },

    /// Gracefully shut down the monitor actor
    Shutdown,
}
