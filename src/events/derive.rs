use tracing::debug;

use crate::alerts::{Alert, AlertSeverity};

use super::{Event, EventSeverity, EventStatus, Priority};

/// Last id handed out before the first event
pub const FIRST_EVENT_COUNTER: u64 = 1000;

/// Monotonic `EVT<n>` id source shared by derived and manual events
#[derive(Debug, Clone)]
pub struct EventIdSequence {
    counter: u64,
}

impl EventIdSequence {
    pub fn new() -> Self {
        Self::starting_after(FIRST_EVENT_COUNTER)
    }

    pub fn starting_after(counter: u64) -> Self {
        Self { counter }
    }

    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("EVT{}", self.counter)
    }
}

impl Default for EventIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Materializes exactly one event per alert
#[derive(Debug, Clone, Default)]
pub struct AlertToEventDeriver {
    ids: EventIdSequence,
}

impl AlertToEventDeriver {
    /// Id for an event that does not come from an alert
    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    pub fn derive(&mut self, alert: &Alert) -> Event {
        let id = self.ids.next_id();
        let metric = alert.metric.human_name();

        debug!("{}: deriving {id} from {} alert", alert.server, alert.severity);

        Event {
            number: id.clone(),
            id,
            title: format!("{metric} threshold exceeded on {}", alert.server),
            description: format!(
                "{metric} usage at {:.1}% exceeds threshold of {}%",
                alert.value, alert.threshold
            ),
            source: alert.server.clone(),
            severity: EventSeverity::from(alert.severity),
            priority: match alert.severity {
                AlertSeverity::Critical => Priority::High,
                AlertSeverity::Warning => Priority::Medium,
            },
            status: EventStatus::New,
            category: "Performance".to_string(),
            assigned_to: "Unassigned".to_string(),
            created_at: alert.timestamp,
            updated_at: alert.timestamp,
            resolved_at: None,
            notes: vec![],
        }
    }
}
