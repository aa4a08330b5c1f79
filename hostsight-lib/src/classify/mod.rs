//! Severity classification.
//!
//! A percentage maps onto one of three tiers through a pair of cut-offs. The
//! [`ThresholdTable`] holds a default pair plus optional per-dimension overrides and
//! is an explicit configuration input; nothing in the engine hardcodes cut-offs.

mod severity;
mod thresholds;

pub use severity::Severity;
pub use thresholds::{ThresholdTable, Tiers};
