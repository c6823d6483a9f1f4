use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};

use super::{Event, EventPatch};

/// Owner of all incident events, most recent first
///
/// Never evicts; the store grows for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) {
        self.events.insert(0, event);
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: EventPatch,
        now: DateTime<Utc>,
    ) -> MonitorResult<Event> {
        let event = self
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| MonitorError::NotFound(id.to_string()))?;

        event.apply(patch, now);
        Ok(event.clone())
    }

    /// Remove every event carrying `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        let removed = before - self.events.len();

        debug!("deleted {removed} event(s) with id {id}");
        removed > 0
    }

    pub fn list(&self) -> Vec<Event> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
