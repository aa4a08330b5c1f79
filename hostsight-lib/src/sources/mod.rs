//! Access to the per-dimension visibility endpoints.
//!
//! Every organizational dimension is served by its own endpoint on the data
//! source. [`SourceClient`] issues one GET per dimension and hands back the parsed
//! JSON body; anything that prevents a usable body from arriving is reported as a
//! [`LoadError`]. The [`MetricSource`] trait is the seam the refresh loop fetches
//! through, so tests can substitute canned payloads for the HTTP client.

mod client;
mod dimension;
mod load_error;

pub use client::{DEFAULT_BASE_URL, MetricSource, SourceClient};
pub use dimension::Dimension;
pub use load_error::LoadError;
