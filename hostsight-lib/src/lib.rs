#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for hostsight
//!
//! This library consolidates all functionality for the hostsight tool, which reports
//! how much of an organization's host inventory is actually observed by its security
//! monitoring platforms, sliced across organizational dimensions.
//!
//! # Module Organization
//!
//! - [`sources`]: HTTP access to the per-dimension visibility endpoints
//! - [`metrics`]: Normalization of raw payloads into canonical visibility metrics
//! - [`classify`]: Severity classification against configurable thresholds
//! - [`aggregate`]: Per-dimension aggregation and view model assembly
//! - [`refresh`]: The refresh loop publishing view model snapshots
//! - [`reports`]: Console and JSON renderings of a snapshot
//! - `commands`: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod aggregate;
pub mod classify;
mod commands;
pub mod metrics;
pub mod refresh;
pub mod reports;
pub mod sources;

pub use crate::commands::{Host, run};
