use crate::aggregate::ViewModel;
use crate::sources::LoadError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use strum::Display;

/// Where the refresh loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LoadPhase {
    /// Nothing has been attempted yet
    Idle,

    /// A tick is in flight
    Loading,

    /// The last tick succeeded
    Ready,

    /// The last tick failed
    Error,
}

/// How current the published view model is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Freshness {
    NeverLoaded,
    Fresh,

    /// A view model exists but the most recent tick failed
    Stale,
}

/// What consumers of the refresh loop observe.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: LoadPhase,

    /// The most recent successfully assembled snapshot
    pub view_model: Option<Arc<ViewModel>>,

    /// Why the most recent tick failed, cleared by the next success
    pub last_error: Option<LoadError>,

    /// Number of ticks started so far
    pub ticks_started: u64,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            phase: LoadPhase::Idle,
            view_model: None,
            last_error: None,
            ticks_started: 0,
            last_attempt_at: None,
            last_success_at: None,
        }
    }

    /// The state once tick number `tick` has started.
    #[must_use]
    pub fn loading(&self, tick: u64, at: DateTime<Utc>) -> Self {
        Self {
            phase: LoadPhase::Loading,
            ticks_started: tick,
            last_attempt_at: Some(at),
            ..self.clone()
        }
    }

    /// The state once a tick has finished with `outcome`.
    ///
    /// A failure keeps the previous view model.
    #[must_use]
    pub fn completed(&self, outcome: Result<ViewModel, LoadError>, at: DateTime<Utc>) -> Self {
        match outcome {
            Ok(view_model) => Self {
                phase: LoadPhase::Ready,
                view_model: Some(Arc::new(view_model)),
                last_error: None,
                last_success_at: Some(at),
                ..self.clone()
            },
            Err(e) => Self {
                phase: LoadPhase::Error,
                last_error: Some(e),
                ..self.clone()
            },
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub const fn freshness(&self) -> Freshness {
        match (&self.view_model, &self.last_error) {
            (None, _) => Freshness::NeverLoaded,
            (Some(_), Some(_)) => Freshness::Stale,
            (Some(_), None) => Freshness::Fresh,
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::idle()
    }
}
