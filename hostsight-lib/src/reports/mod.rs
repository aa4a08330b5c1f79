//! Report generation for dashboard snapshots
//!
//! Two generators are provided, each accessed through a `generate` function:
//! - **Console**: Terminal output, optionally colored by severity
//! - **JSON**: Machine-readable structured data
//!
//! Both operate on a [`DashboardState`](crate::refresh::DashboardState), so they
//! can render the load status (never loaded, fresh, or stale with the last error)
//! next to the most recent view model. Neither generator mutates what it renders.

mod common;
mod console;
mod json;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
