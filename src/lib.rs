pub mod actors;
pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod grafana;
pub mod monitors;
pub mod pipeline;
pub mod util;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::Alert;

/// The resource metrics fabricated for every host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CpuUsage,
    MemoryUsage,
    DiskUsage,
    NetworkTraffic,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuUsage,
        Metric::MemoryUsage,
        Metric::DiskUsage,
        Metric::NetworkTraffic,
    ];

    /// Get the string representation (snake_case)
    ///
    /// This matches the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CpuUsage => "cpu_usage",
            Metric::MemoryUsage => "memory_usage",
            Metric::DiskUsage => "disk_usage",
            Metric::NetworkTraffic => "network_traffic",
        }
    }

    /// Title-cased name used in event titles, e.g. "Cpu Usage".
    pub fn human_name(&self) -> &'static str {
        match self {
            Metric::CpuUsage => "Cpu Usage",
            Metric::MemoryUsage => "Memory Usage",
            Metric::DiskUsage => "Disk Usage",
            Metric::NetworkTraffic => "Network Traffic",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fabricated reading. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub host: String,
    pub metric: Metric,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Metric values of one host within a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub name: String,
    pub status: String,
    pub metrics: BTreeMap<Metric, f64>,
}

impl ServerSnapshot {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }
}

/// The result of one sampling pass over all hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub servers: Vec<ServerSnapshot>,

    /// Alerts raised during this pass only
    pub alerts: Vec<Alert>,
}
