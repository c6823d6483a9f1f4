//! MonitorActor - Owns the pipeline and runs the background tick
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Pipeline::generate_snapshot → Publisher (monitoring_update) → [WebSocket clients, ...]
//!     ↑
//!     └─── Commands (GenerateSnapshot, Peek, event CRUD, Subscribe, UpdateInterval, Shutdown)
//! ```
//!
//! Commands and ticks are handled one at a time, so the alert log, the event
//! store and the id counter are only ever touched by one operation at once.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, instrument, trace, warn};

use crate::{
    Snapshot,
    alerts::Alert,
    config::Config,
    error::{MonitorError, MonitorResult},
    events::{Event, EventPatch, NewEvent},
    monitors::sampler::{MetricSampler, ValueSource},
    pipeline::Pipeline,
};

use super::{
    messages::{MonitorCommand, MonitorStats, Signal},
    publisher::{Publisher, Subscription},
};

/// Actor that ticks the pipeline and serializes all access to it
pub struct MonitorActor {
    pipeline: Pipeline,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<MonitorCommand>,

    /// Current tick interval
    interval_duration: Duration,
}

fn tick_interval(period: Duration) -> Interval {
    // first tick one full period after start, like the timer it models
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl MonitorActor {
    pub fn new(
        pipeline: Pipeline,
        command_rx: mpsc::Receiver<MonitorCommand>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            pipeline,
            command_rx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        let mut ticker = tick_interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = self.pipeline.generate_snapshot();
                    self.pipeline.publisher().snapshot(snapshot);
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(MonitorCommand::UpdateInterval { interval_secs }) => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs.max(1));
                            ticker = tick_interval(self.interval_duration);
                        }

                        Some(MonitorCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        Some(cmd) => self.handle_command(cmd),

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        debug!("monitor actor stopped");
    }

    fn handle_command(&mut self, cmd: MonitorCommand) {
        trace!("handling {cmd:?}");

        // A dropped receiver only means the caller stopped waiting.
        match cmd {
            MonitorCommand::GenerateSnapshot { respond_to } => {
                let _ = respond_to.send(self.pipeline.generate_snapshot());
            }
            MonitorCommand::Peek { respond_to } => {
                let _ = respond_to.send(self.pipeline.peek());
            }
            MonitorCommand::CurrentSnapshot { respond_to } => {
                let _ = respond_to.send(self.pipeline.current_snapshot());
            }
            MonitorCommand::ListAlerts { limit, respond_to } => {
                let _ = respond_to.send(self.pipeline.recent_alerts(limit));
            }
            MonitorCommand::ListEvents { respond_to } => {
                let _ = respond_to.send(self.pipeline.list_events());
            }
            MonitorCommand::GetEvent { id, respond_to } => {
                let _ = respond_to.send(self.pipeline.get_event(&id));
            }
            MonitorCommand::CreateEvent { event, respond_to } => {
                let _ = respond_to.send(self.pipeline.create_event(event));
            }
            MonitorCommand::UpdateEvent {
                id,
                patch,
                respond_to,
            } => {
                let _ = respond_to.send(self.pipeline.update_event(&id, patch));
            }
            MonitorCommand::DeleteEvent { id, respond_to } => {
                self.pipeline.delete_event(&id);
                let _ = respond_to.send(());
            }
            MonitorCommand::GetStats { respond_to } => {
                let _ = respond_to.send(self.pipeline.stats());
            }
            MonitorCommand::Subscribe { respond_to } => {
                let rx = self.pipeline.publisher().subscribe();
                let _ = respond_to.send((self.pipeline.current_snapshot(), rx));
            }
            MonitorCommand::UpdateInterval { .. } | MonitorCommand::Shutdown => {}
        }
    }
}

/// Handle for talking to the MonitorActor
///
/// Cheap to clone and shared by every API handler.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Spawn a monitor actor sampling from the OS-seeded random source
    pub fn spawn(config: &Config) -> Self {
        Self::spawn_with_sampler(config, MetricSampler::random(config))
    }

    /// Spawn a monitor actor drawing readings from `source`
    pub fn spawn_with_source(config: &Config, source: Box<dyn ValueSource>) -> Self {
        Self::spawn_with_sampler(config, MetricSampler::new(config, source))
    }

    fn spawn_with_sampler(config: &Config, sampler: MetricSampler) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let pipeline = Pipeline::new(config, sampler, Publisher::default());
        let interval = Duration::from_secs(config.interval.max(1));
        let actor = MonitorActor::new(pipeline, cmd_rx, interval);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> MonitorCommand,
    ) -> MonitorResult<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(command(tx))
            .await
            .map_err(|_| MonitorError::ActorUnavailable)?;

        rx.await.map_err(|_| MonitorError::ActorUnavailable)
    }

    /// Run one full sampling pass. Appends alerts and derived events.
    pub async fn generate_snapshot(&self) -> MonitorResult<Snapshot> {
        self.request(|respond_to| MonitorCommand::GenerateSnapshot { respond_to })
            .await
    }

    /// The last generated snapshot, without sampling
    pub async fn peek(&self) -> MonitorResult<Option<Snapshot>> {
        self.request(|respond_to| MonitorCommand::Peek { respond_to })
            .await
    }

    /// The last generated snapshot, or a fresh one if none exists yet
    pub async fn current_snapshot(&self) -> MonitorResult<Snapshot> {
        self.request(|respond_to| MonitorCommand::CurrentSnapshot { respond_to })
            .await
    }

    pub async fn list_alerts(&self, limit: Option<usize>) -> MonitorResult<Vec<Alert>> {
        self.request(|respond_to| MonitorCommand::ListAlerts { limit, respond_to })
            .await
    }

    pub async fn list_events(&self) -> MonitorResult<Vec<Event>> {
        self.request(|respond_to| MonitorCommand::ListEvents { respond_to })
            .await
    }

    pub async fn get_event(&self, id: String) -> MonitorResult<Event> {
        self.request(|respond_to| MonitorCommand::GetEvent {
            id: id.clone(),
            respond_to,
        })
        .await?
        .ok_or(MonitorError::NotFound(id))
    }

    pub async fn create_event(&self, event: NewEvent) -> MonitorResult<Event> {
        self.request(|respond_to| MonitorCommand::CreateEvent { event, respond_to })
            .await
    }

    pub async fn update_event(&self, id: String, patch: EventPatch) -> MonitorResult<Event> {
        self.request(|respond_to| MonitorCommand::UpdateEvent {
            id,
            patch,
            respond_to,
        })
        .await?
    }

    /// Delete an event. Succeeds whether or not the id exists.
    pub async fn delete_event(&self, id: String) -> MonitorResult<()> {
        self.request(|respond_to| MonitorCommand::DeleteEvent { id, respond_to })
            .await
    }

    pub async fn stats(&self) -> MonitorResult<MonitorStats> {
        self.request(|respond_to| MonitorCommand::GetStats { respond_to })
            .await
    }

    /// Subscribe to snapshots and event signals.
    ///
    /// The subscription yields the current snapshot first. Signals published
    /// after it are delivered in order; none published before it are replayed.
    pub async fn subscribe(&self) -> MonitorResult<Subscription> {
        let (snapshot, rx): (Snapshot, broadcast::Receiver<Signal>) = self
            .request(|respond_to| MonitorCommand::Subscribe { respond_to })
            .await?;

        Ok(Subscription::new(snapshot, rx))
    }

    /// Update the background tick interval
    pub async fn update_interval(&self, interval_secs: u64) -> MonitorResult<()> {
        self.sender
            .send(MonitorCommand::UpdateInterval { interval_secs })
            .await
            .map_err(|_| MonitorError::ActorUnavailable)
    }

    /// Gracefully shut down the monitor actor
    pub async fn shutdown(&self) -> MonitorResult<()> {
        self.sender
            .send(MonitorCommand::Shutdown)
            .await
            .map_err(|_| MonitorError::ActorUnavailable)
    }
}
