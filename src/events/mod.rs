//! Incident events
//!
//! Events are the trackable, mutable counterpart of alerts. Most are derived
//! automatically from alerts, the rest are created by hand through the API.
//!
//! Payloads for creation and updates are applied permissively: recognized
//! fields are taken, unknown fields and values that do not parse are skipped.

pub mod derive;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    alerts::AlertSeverity,
    error::{MonitorError, MonitorResult},
};

pub use derive::{AlertToEventDeriver, EventIdSequence};
pub use store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Low,
    Medium,
    High,
    Warning,
    Critical,
}

impl From<AlertSeverity> for EventSeverity {
    fn from(value: AlertSeverity) -> Self {
        match value {
            AlertSeverity::Warning => EventSeverity::Warning,
            AlertSeverity::Critical => EventSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    New,
    #[serde(alias = "in-progress")]
    InProgress,
    #[serde(alias = "on-hold")]
    OnHold,
    Resolved,
    Closed,
}

impl EventStatus {
    /// Resolved and closed both stamp `resolved_at`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Resolved | EventStatus::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,

    /// Display number, same value as `id`
    pub number: String,

    pub title: String,
    pub description: String,
    pub source: String,
    pub severity: EventSeverity,
    pub priority: Priority,
    pub status: EventStatus,
    pub category: String,
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub notes: Vec<Note>,
}

impl Event {
    /// Apply the fields present in `patch`.
    ///
    /// `resolved_at` is stamped on every transition into resolved or closed,
    /// also when the event already was resolved. `updated_at` always moves.
    pub fn apply(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
            if status.is_terminal() {
                self.resolved_at = Some(now);
            }
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(text) = patch.note {
            self.notes.push(Note {
                text,
                timestamp: now,
            });
        }

        self.updated_at = now;
    }
}

/// Partial update of an event; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub severity: Option<EventSeverity>,
    pub priority: Option<Priority>,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,

    /// Appended to the event's notes instead of replacing anything
    pub note: Option<String>,
}

impl EventPatch {
    pub fn from_json(value: &Value) -> MonitorResult<EventPatch> {
        let Some(object) = value.as_object() else {
            return Err(MonitorError::InvalidPayload(
                "expected a JSON object".to_string(),
            ));
        };

        let mut patch = EventPatch::default();
        for (key, value) in object {
            match key.as_str() {
                "title" => patch.title = lenient(key, value),
                "description" => patch.description = lenient(key, value),
                "source" => patch.source = lenient(key, value),
                "severity" => patch.severity = lenient(key, value),
                "priority" => patch.priority = lenient(key, value),
                "status" => patch.status = lenient(key, value),
                "category" => patch.category = lenient(key, value),
                "assigned_to" => patch.assigned_to = lenient(key, value),
                "note" => patch.note = lenient(key, value),
                _ => debug!("ignoring unknown event field `{key}`"),
            }
        }

        Ok(patch)
    }
}

fn lenient<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    T::deserialize(value)
        .inspect_err(|e| warn!("ignoring event field `{key}`: {e}"))
        .ok()
}

/// Fields of a manually created event; missing ones take the manual defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub severity: Option<EventSeverity>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
}

impl NewEvent {
    /// Parse a creation payload. Status and notes cannot be preset.
    pub fn from_json(value: &Value) -> MonitorResult<NewEvent> {
        let EventPatch {
            title,
            description,
            source,
            severity,
            priority,
            category,
            assigned_to,
            ..
        } = EventPatch::from_json(value)?;

        Ok(NewEvent {
            title,
            description,
            source,
            severity,
            priority,
            category,
            assigned_to,
        })
    }

    pub fn into_event(self, id: String, now: DateTime<Utc>) -> Event {
        Event {
            number: id.clone(),
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            source: self.source.unwrap_or_else(|| "Manual".to_string()),
            severity: self.severity.unwrap_or(EventSeverity::Low),
            priority: self.priority.unwrap_or(Priority::Low),
            status: EventStatus::New,
            category: self.category.unwrap_or_else(|| "Other".to_string()),
            assigned_to: self.assigned_to.unwrap_or_else(|| "Unassigned".to_string()),
            created_at: now,
            updated_at: now,
            resolved_at: None,
            notes: vec![],
        }
    }
}
