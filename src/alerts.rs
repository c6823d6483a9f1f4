//! Threshold alerts and their bounded history
//!
//! The log keeps alerts in a ring buffer ordered most-recent first. When the
//! buffer is full, the oldest alert is evicted before the new one is stored.
//! Identical alerts from repeated breaches are all kept.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Metric;

/// Alerts retained by default
pub const DEFAULT_ALERT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A threshold breach. Immutable once raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,

    /// Host the reading belongs to
    pub server: String,

    pub metric: Metric,
    pub value: f64,
    pub threshold: f64,
    pub severity: AlertSeverity,
}

/// Bounded most-recent-first alert history
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ALERT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, alert: Alert) {
        if self.capacity == 0 {
            return;
        }

        if self.alerts.len() >= self.capacity
            && let Some(evicted) = self.alerts.pop_back()
        {
            trace!(
                "alert log full, evicting {} alert for {} from {}",
                evicted.metric, evicted.server, evicted.timestamp
            );
        }

        self.alerts.push_front(alert);
    }

    /// The `n` most recent alerts, newest first
    pub fn recent(&self, n: usize) -> Vec<Alert> {
        self.alerts.iter().take(n).cloned().collect()
    }

    pub fn all(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn critical_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.severity == AlertSeverity::Critical)
            .count()
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new()
    }
}
