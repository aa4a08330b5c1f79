//! Aggregation of normalized metrics into dimension views and a view model
//!
//! [`DimensionAggregate`] summarizes a list of entity metrics: the unweighted mean
//! percentage, the best and worst entities, and how many are critical. A
//! [`DimensionView`] wraps either a single metric (the global dimension) or an
//! aggregate, together with the endpoint's secondary breakdowns and roll-ups.
//!
//! [`ViewModel::assemble`] merges the dimension views of one refresh tick into an
//! immutable snapshot with an overall percentage and severity. Dimensions that are
//! missing or carry no data are left out of the overall figures instead of being
//! counted as zero.

mod dimension_aggregate;
mod view_model;

pub use dimension_aggregate::DimensionAggregate;
pub use view_model::{DimensionSummary, DimensionView, SliceAggregate, ViewModel};
