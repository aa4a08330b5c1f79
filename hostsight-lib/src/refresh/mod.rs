//! Periodic reloading of all dimensions
//!
//! A refresh tick fetches every tracked dimension concurrently, normalizes and
//! aggregates the payloads, and assembles a fresh [`ViewModel`](crate::aggregate::ViewModel).
//! Any failed dimension fails the whole tick; partial snapshots are never published.
//!
//! [`RefreshScheduler`] runs ticks back to back on a single task, separated by a
//! fixed interval, and publishes a [`DashboardState`] through a watch channel after
//! every transition. Ticks never overlap: a manual refresh requested while a tick
//! is in flight is skipped. After a failed tick the previous view model stays
//! published next to the error, so consumers can tell a stale snapshot from one
//! that was never loaded.

mod dashboard_state;
mod scheduler;
mod tick;

pub use dashboard_state::{DashboardState, Freshness, LoadPhase};
pub use scheduler::{DEFAULT_REFRESH_INTERVAL, RefreshScheduler, SchedulerSettings};
pub use tick::load_view_model;
