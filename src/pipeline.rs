//! One sampling pass and the event operations around it
//!
//! ```text
//! MetricSampler → ThresholdEvaluator → AlertLog.append ─┐
//!                                    └→ AlertToEventDeriver → EventStore.insert
//!                                                          → Publisher (event_created)
//! ```
//!
//! The pipeline owns all mutable state. It is driven by a single
//! [`MonitorActor`](crate::actors::monitor::MonitorActor), which gives each
//! operation exclusive access without further locking.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, error, instrument};

use crate::{
    Metric, Sample, ServerSnapshot, Snapshot,
    actors::{messages::MonitorStats, publisher::Publisher},
    alerts::{Alert, AlertLog},
    config::Config,
    error::MonitorResult,
    events::{AlertToEventDeriver, Event, EventPatch, EventStore, NewEvent},
    monitors::{sampler::MetricSampler, threshold::ThresholdEvaluator},
};

#[derive(Debug)]
pub struct Pipeline {
    hosts: Vec<String>,
    sampler: MetricSampler,
    evaluator: ThresholdEvaluator,
    alert_log: AlertLog,
    deriver: AlertToEventDeriver,
    events: EventStore,
    publisher: Publisher,
    last_snapshot: Option<Snapshot>,
}

impl Pipeline {
    pub fn new(config: &Config, sampler: MetricSampler, publisher: Publisher) -> Self {
        Self {
            hosts: config.hosts.clone(),
            sampler,
            evaluator: ThresholdEvaluator::new(config),
            alert_log: AlertLog::with_capacity(config.alert_history),
            deriver: AlertToEventDeriver::default(),
            events: EventStore::new(),
            publisher,
            last_snapshot: None,
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Sample every (host, metric) pair and record the resulting alerts.
    ///
    /// A failed draw is logged and skipped; the rest of the pass continues.
    #[instrument(skip(self))]
    pub fn generate_snapshot(&mut self) -> Snapshot {
        let timestamp = Utc::now();
        let mut servers = Vec::with_capacity(self.hosts.len());
        let mut alerts = vec![];

        for host in self.hosts.clone() {
            let mut metrics = BTreeMap::new();

            for metric in Metric::ALL {
                let value = match self.sampler.sample(&host, metric) {
                    Ok(value) => value,
                    Err(e) => {
                        error!("{host}: skipping {metric}: {e}");
                        continue;
                    }
                };
                metrics.insert(metric, value);

                let sample = Sample {
                    host: host.clone(),
                    metric,
                    value,
                    timestamp,
                };
                if let Some(alert) = self.evaluator.evaluate_sample(&sample) {
                    self.record_alert(alert.clone());
                    alerts.push(alert);
                }
            }

            servers.push(ServerSnapshot {
                name: host,
                status: "online".to_string(),
                metrics,
            });
        }

        debug!("generated snapshot with {} alert(s)", alerts.len());

        let snapshot = Snapshot {
            timestamp,
            servers,
            alerts,
        };
        self.last_snapshot = Some(snapshot.clone());
        snapshot
    }

    /// Append `alert` to the history and materialize its event.
    ///
    /// Both happen in this one step, one event per alert.
    pub fn record_alert(&mut self, alert: Alert) -> Event {
        let event = self.deriver.derive(&alert);
        self.alert_log.append(alert);
        self.events.insert(event.clone());
        self.publisher.event_created(event.clone());
        event
    }

    pub fn peek(&self) -> Option<Snapshot> {
        self.last_snapshot.clone()
    }

    pub fn current_snapshot(&mut self) -> Snapshot {
        match self.peek() {
            Some(snapshot) => snapshot,
            None => self.generate_snapshot(),
        }
    }

    pub fn recent_alerts(&self, limit: Option<usize>) -> Vec<Alert> {
        match limit {
            Some(n) => self.alert_log.recent(n),
            None => self.alert_log.all(),
        }
    }

    pub fn list_events(&self) -> Vec<Event> {
        self.events.list()
    }

    pub fn get_event(&self, id: &str) -> Option<Event> {
        self.events.get(id).cloned()
    }

    pub fn create_event(&mut self, new_event: NewEvent) -> Event {
        let id = self.deriver.next_id();
        let event = new_event.into_event(id, Utc::now());
        debug!("created event {}", event.id);

        self.events.insert(event.clone());
        self.publisher.event_created(event.clone());
        event
    }

    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> MonitorResult<Event> {
        let event = self.events.update(id, patch, Utc::now())?;
        debug!("updated event {id}");

        self.publisher.event_updated(event.clone());
        Ok(event)
    }

    pub fn delete_event(&mut self, id: &str) {
        self.events.delete(id);
        self.publisher.event_deleted(id.to_string());
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            alerts: self.alert_log.len(),
            critical_alerts: self.alert_log.critical_count(),
            events: self.events.len(),
            hosts: self.hosts.len(),
            subscribers: self.publisher.subscriber_count(),
        }
    }
}
