//! Translation of hub state into Grafana's JSON datasource protocol
//!
//! Everything here is pure: the API layer fetches a snapshot, the alert history
//! and the counters, and these functions shape them into the protocol's
//! `search`, `query`, `annotations` and flat metric responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Metric, ServerSnapshot, Snapshot, actors::messages::MonitorStats, alerts::Alert};

/// Alerts turned into annotations per request
pub const ANNOTATION_LIMIT: usize = 10;

/// Health penalty per breached resource
const HEALTH_PENALTY: f64 = 20.0;

/// Resource limits that count against a host's health score
const HEALTH_LIMITS: [(Metric, f64); 3] = [
    (Metric::CpuUsage, 80.0),
    (Metric::MemoryUsage, 85.0),
    (Metric::DiskUsage, 90.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Resource(Metric),
    AlertsCount,
    EventsCount,
    CriticalAlerts,
    HealthScore,
}

impl Target {
    pub const ALL: [Target; 8] = [
        Target::Resource(Metric::CpuUsage),
        Target::Resource(Metric::MemoryUsage),
        Target::Resource(Metric::DiskUsage),
        Target::Resource(Metric::NetworkTraffic),
        Target::AlertsCount,
        Target::EventsCount,
        Target::CriticalAlerts,
        Target::HealthScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Resource(metric) => metric.as_str(),
            Target::AlertsCount => "alerts_count",
            Target::EventsCount => "events_count",
            Target::CriticalAlerts => "critical_alerts",
            Target::HealthScore => "health_score",
        }
    }

    pub fn parse(name: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|target| target.as_str() == name)
    }
}

/// Names offered by `/search`
pub fn searchable_targets() -> Vec<&'static str> {
    Target::ALL.iter().map(Target::as_str).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub targets: Vec<QueryTarget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryTarget {
    #[serde(default)]
    pub target: String,
}

/// `[value, epoch_ms]`
pub type Datapoint = (f64, i64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub target: String,
    pub datapoints: Vec<Datapoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub annotation: &'static str,
    pub time: i64,
    pub title: String,
    pub tags: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReading {
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub value: f64,
    pub timestamp: String,
}

/// Mean host health: 100 minus 20 per breached cpu/memory/disk limit.
///
/// A fleet without hosts is perfectly healthy.
pub fn health_score(servers: &[ServerSnapshot]) -> f64 {
    if servers.is_empty() {
        return 100.0;
    }

    let total: f64 = servers
        .iter()
        .map(|server| {
            let breaches = HEALTH_LIMITS
                .iter()
                .filter(|(metric, limit)| server.metric(*metric).unwrap_or(0.0) > *limit)
                .count();
            (100.0 - HEALTH_PENALTY * breaches as f64).max(0.0)
        })
        .sum();

    total / servers.len() as f64
}

/// Answer a `/query` request. Unknown targets are skipped.
pub fn query(
    targets: &[QueryTarget],
    snapshot: &Snapshot,
    stats: &MonitorStats,
    now: DateTime<Utc>,
) -> Vec<TimeSeries> {
    let timestamp = now.timestamp_millis();

    targets
        .iter()
        .filter_map(|target| Target::parse(&target.target))
        .map(|target| {
            let datapoints = match target {
                Target::Resource(metric) => snapshot
                    .servers
                    .iter()
                    .map(|server| (server.metric(metric).unwrap_or(0.0), timestamp))
                    .collect(),
                Target::AlertsCount => vec![(stats.alerts as f64, timestamp)],
                Target::EventsCount => vec![(stats.events as f64, timestamp)],
                Target::CriticalAlerts => vec![(stats.critical_alerts as f64, timestamp)],
                Target::HealthScore => vec![(health_score(&snapshot.servers), timestamp)],
            };

            TimeSeries {
                target: target.as_str().to_string(),
                datapoints,
            }
        })
        .collect()
}

/// The most recent alerts as annotations, newest first
pub fn annotations(alerts: &[Alert]) -> Vec<Annotation> {
    alerts
        .iter()
        .take(ANNOTATION_LIMIT)
        .map(|alert| Annotation {
            annotation: "alerts",
            time: alert.timestamp.timestamp_millis(),
            title: format!("{} - {}", alert.server, alert.metric),
            tags: vec![alert.severity.to_string(), alert.server.clone()],
            text: format!(
                "{} at {:.1}% (threshold: {}%)",
                alert.metric, alert.value, alert.threshold
            ),
        })
        .collect()
}

/// Flat list of every host reading plus the aggregate counters
pub fn metric_listing(
    snapshot: &Snapshot,
    stats: &MonitorStats,
    now: DateTime<Utc>,
) -> Vec<MetricReading> {
    let timestamp = now.to_rfc3339();

    let mut readings: Vec<MetricReading> = snapshot
        .servers
        .iter()
        .flat_map(|server| {
            server.metrics.iter().map(|(metric, value)| MetricReading {
                metric: metric.to_string(),
                server: Some(server.name.clone()),
                value: *value,
                timestamp: timestamp.clone(),
            })
        })
        .collect();

    let aggregates = [
        ("total_alerts", stats.alerts),
        ("total_events", stats.events),
        ("critical_alerts", stats.critical_alerts),
    ];
    readings.extend(aggregates.into_iter().map(|(metric, value)| MetricReading {
        metric: metric.to_string(),
        server: None,
        value: value as f64,
        timestamp: timestamp.clone(),
    }));

    readings
}
