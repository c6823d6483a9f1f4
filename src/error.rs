//! Error types for pipeline operations

use std::fmt;

use crate::Metric;

/// Result type alias for pipeline operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur while generating data or managing events
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorError {
    /// No event with the given id exists
    NotFound(String),

    /// A create/update payload was not a JSON object
    InvalidPayload(String),

    /// A metric's sampling range cannot be drawn from
    InvalidRange { metric: Metric, min: f64, max: f64 },

    /// The monitor actor is no longer running
    ActorUnavailable,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::NotFound(id) => write!(f, "event {} not found", id),
            MonitorError::InvalidPayload(msg) => write!(f, "invalid payload: {}", msg),
            MonitorError::InvalidRange { metric, min, max } => {
                write!(f, "invalid sampling range for {}: [{}, {}]", metric, min, max)
            }
            MonitorError::ActorUnavailable => write!(f, "monitor actor is not running"),
        }
    }
}

impl std::error::Error for MonitorError {}
