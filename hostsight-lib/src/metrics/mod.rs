//! Canonical visibility metrics and the normalization of raw payloads into them
//!
//! Every endpoint of the data source speaks a slightly different dialect: some
//! report totals and visible counts, some report protected and unprotected hosts,
//! and the global endpoint reports per-platform percentages. This module turns all
//! of them into one shape, the [`VisibilityMetric`].
//!
//! # Implementation Model
//!
//! The layout of each dimension's payload is declared once in a static schema
//! table (`schema.rs`). A single [`normalize`] function walks a payload according to
//! its dimension's schema, reading counts, clamping inconsistent values, and
//! classifying every resulting metric. There is no per-dimension normalization code.
//!
//! Derived quantities (invisible counts, gap percentages, and the both/either/neither
//! combination buckets for two platforms) live in `derive.rs` and are pure functions
//! of the counts.
//!
//! Inconsistent counts never fail a load. They are clamped into range, logged at
//! `warn`, and flagged on the metric through [`VisibilityMetric::clamped`]. Structural
//! problems, on the other hand, are errors that fail the whole dimension.

mod derive;
mod normalize;
mod platform;
mod schema;
mod visibility_metric;

pub use derive::{Counts, KnownOverlap, PlatformOverlap, gap_percentage, percentage};
pub use normalize::{MetricList, NormalizedDimension, Primary, UNKNOWN_ENTITY, normalize};
pub use platform::Platform;
pub use visibility_metric::VisibilityMetric;
