//! The cooperative poll loop.
//!
//! A single task owns the [`Dashboard`] and is its only mutator. Snapshot
//! reads and classification requests run as spawned tasks; their results
//! come back over channels and are applied at the loop's resumption points,
//! never concurrently. Derived state is published on a watch channel for
//! the render layer.
//!
//! Tick overlap is an explicit policy: [`TickPolicy::Serialize`] (default)
//! skips a tick while a read is still in flight, so a slow backend cannot
//! race itself; [`TickPolicy::AllowOverlap`] keeps the historical
//! fire-every-period behavior.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use agriwatch_adapters::AdapterError;
use agriwatch_types::{Prediction, Snapshot};

use crate::app::{Dashboard, DashboardState};
use crate::data::Classifier;
use crate::source::{ReadError, SnapshotSource};

/// Default poll period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// What to do when a tick fires while a snapshot read is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Skip the tick; at most one read in flight at a time.
    #[default]
    Serialize,
    /// Start another read anyway.
    AllowOverlap,
}

/// Poll loop configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Period between snapshot reads.
    pub interval: Duration,
    /// Overlap policy for slow reads.
    pub tick_policy: TickPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            tick_policy: TickPolicy::default(),
        }
    }
}

/// Drives periodic snapshot reads and hands results to the dashboard.
#[derive(Debug)]
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    classifier: Option<Arc<dyn Classifier>>,
    config: PollConfig,
}

impl Poller {
    /// Create a poller over the given source.
    ///
    /// Without a classifier, controller images are tracked but never
    /// classified; the prediction stays unavailable.
    pub fn new(source: Arc<dyn SnapshotSource>, config: PollConfig) -> Self {
        Self {
            source,
            classifier: None,
            config,
        }
    }

    /// Attach a classification backend.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Spawn the loop.
    ///
    /// Returns a stop handle and the receiving end of the state channel.
    /// The channel starts with an empty [`DashboardState`]; every applied
    /// read or classification result publishes a fresh one.
    pub fn start(self) -> (PollHandle, watch::Receiver<DashboardState>) {
        let (state_tx, state_rx) = watch::channel(DashboardState::default());
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(run(
            self.source,
            self.classifier,
            self.config,
            state_tx,
            stop_rx,
        ));

        (PollHandle { stop_tx, task }, state_rx)
    }
}

/// Handle for stopping a running poll loop.
#[derive(Debug)]
pub struct PollHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Signal the loop to stop after its current resumption point.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Signal the loop to stop and wait for it to finish.
    ///
    /// Results of requests still in flight are dropped with the loop.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}

async fn run(
    source: Arc<dyn SnapshotSource>,
    classifier: Option<Arc<dyn Classifier>>,
    config: PollConfig,
    state_tx: watch::Sender<DashboardState>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut dashboard = Dashboard::new();

    let mut ticker = tokio::time::interval(config.interval);
    // A stalled loop resumes with one tick, not a burst of catch-up ticks
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (read_tx, mut read_rx) = mpsc::channel::<Result<Snapshot, ReadError>>(8);
    let (classify_tx, mut classify_rx) =
        mpsc::channel::<(String, Result<Prediction, AdapterError>)>(8);
    let mut reads_in_flight: usize = 0;

    debug!("poll loop started: {}", source.description());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if config.tick_policy == TickPolicy::Serialize && reads_in_flight > 0 {
                    debug!("snapshot read still in flight; skipping tick");
                } else {
                    reads_in_flight += 1;
                    let source = Arc::clone(&source);
                    let read_tx = read_tx.clone();
                    tokio::spawn(async move {
                        let result = source.read().await;
                        let _ = read_tx.send(result).await;
                    });
                }
            }
            Some(result) = read_rx.recv() => {
                reads_in_flight = reads_in_flight.saturating_sub(1);
                match result {
                    Ok(snapshot) => {
                        if let Some(image) = dashboard.apply_snapshot(&snapshot) {
                            match &classifier {
                                Some(classifier) => {
                                    let classifier = Arc::clone(classifier);
                                    let classify_tx = classify_tx.clone();
                                    tokio::spawn(async move {
                                        let result = classifier.classify(&image).await;
                                        let _ = classify_tx.send((image, result)).await;
                                    });
                                }
                                None => {
                                    debug!("no classifier configured; image left unclassified");
                                }
                            }
                        }
                    }
                    Err(err) => {
                        warn!("snapshot read failed: {}", err);
                        dashboard.apply_read_error(&err);
                    }
                }
                let _ = state_tx.send(dashboard.state().clone());
            }
            Some((image, result)) = classify_rx.recv() => {
                dashboard.apply_classification(&image, result);
                let _ = state_tx.send(dashboard.state().clone());
            }
            changed = stop_rx.changed() => {
                // A dropped handle counts as a stop signal
                if changed.is_err() || *stop_rx.borrow() {
                    debug!("poll loop stopping");
                    break;
                }
            }
        }
    }
}
