use super::{DashboardState, load_view_model};
use crate::classify::ThresholdTable;
use crate::sources::{Dimension, MetricSource};
use chrono::Utc;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "    refresh";

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// What the refresh loop loads and how often.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Pause between the end of one tick and the start of the next
    pub interval: Duration,
    pub dimensions: Vec<Dimension>,
    pub thresholds: ThresholdTable,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            dimensions: Dimension::all().collect(),
            thresholds: ThresholdTable::default(),
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: watch::Sender<DashboardState>,
    in_flight: AtomicBool,
    wake: Notify,
}

/// Runs refresh ticks on a background task and publishes the resulting state.
///
/// The first tick starts immediately. Dropping the scheduler aborts the task;
/// [`shutdown`](Self::shutdown) stops it and waits for it to finish.
#[derive(Debug)]
pub struct RefreshScheduler {
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Start refreshing from `source`. Must be called within a Tokio runtime.
    #[must_use]
    pub fn start<S: MetricSource + 'static>(source: S, settings: SchedulerSettings) -> Self {
        let (state, _) = watch::channel(DashboardState::idle());
        let (shutdown, shutdown_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            state,
            in_flight: AtomicBool::new(false),
            wake: Notify::new(),
        });

        let task = tokio::spawn(refresh_loop(source, settings, Arc::clone(&shared), shutdown_rx));

        Self {
            shared,
            shutdown,
            task: Some(task),
        }
    }

    /// Observe every published state, starting with the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.shared.state.subscribe()
    }

    /// A copy of the most recently published state.
    #[must_use]
    pub fn current(&self) -> DashboardState {
        self.shared.state.borrow().clone()
    }

    /// Ask for a tick now instead of at the end of the interval.
    ///
    /// Returns `false`, and does nothing, when a tick is already in flight. A
    /// request that races with the start of a tick is absorbed by that tick.
    pub fn request_refresh(&self) -> bool {
        if self.shared.in_flight.load(Ordering::Acquire) {
            log::debug!(target: LOG_TARGET, "Refresh already in flight, skipping manual request");
            return false;
        }

        self.shared.wake.notify_one();
        true
    }

    /// Stop refreshing. Any in-flight tick is abandoned and its results discarded.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

async fn refresh_loop<S: MetricSource>(source: S, settings: SchedulerSettings, shared: Arc<Shared>, mut shutdown: watch::Receiver<bool>) {
    let mut state = DashboardState::idle();
    let mut tick = 0;

    loop {
        tick += 1;
        shared.in_flight.store(true, Ordering::Release);
        state = state.loading(tick, Utc::now());
        let _ = shared.state.send_replace(state.clone());

        let outcome = tokio::select! {
            outcome = load_view_model(&source, &settings.dimensions, &settings.thresholds, tick) => outcome,
            _ = shutdown.changed() => {
                log::debug!(target: LOG_TARGET, "Shutting down with tick {tick} in flight");
                break;
            }
        };

        if let Err(e) = &outcome {
            log::error!(target: LOG_TARGET, "Refresh tick {tick} failed: {e}");
        }

        state = state.completed(outcome, Utc::now());

        // drop a wake-up stored while the tick ran so the next interval is not cut short
        if shared.wake.notified().now_or_never().is_some() {
            log::debug!(target: LOG_TARGET, "Discarding refresh request that raced with tick {tick}");
        }

        shared.in_flight.store(false, Ordering::Release);
        let _ = shared.state.send_replace(state.clone());

        tokio::select! {
            () = tokio::time::sleep(settings.interval) => {}
            () = shared.wake.notified() => {
                log::debug!(target: LOG_TARGET, "Manual refresh requested");
            }
            _ = shutdown.changed() => {
                log::debug!(target: LOG_TARGET, "Shutting down after tick {tick}");
                break;
            }
        }
    }

    shared.in_flight.store(false, Ordering::Release);
}
