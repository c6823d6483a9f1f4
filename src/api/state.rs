//! API shared state containing the monitor handle

use crate::actors::monitor::MonitorHandle;

/// Shared state passed to all API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Handle to the monitor actor owning alerts, events and snapshots
    pub monitor: MonitorHandle,
}

impl ApiState {
    pub fn new(monitor: MonitorHandle) -> Self {
        Self { monitor }
    }
}
