//! Command-line interface and orchestration for hostsight
//!
//! This module implements the CLI commands and wires the engine together:
//! configuration, the backend client, the refresh loop, and the reports.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **snapshot**: Run a single refresh tick and report the resulting state
//! - **watch**: Run the refresh scheduler and report every completed tick
//! - **init**: Generate a default configuration file
//! - **validate**: Check configuration file syntax and value ranges
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes
//! to the appropriate command handler. The snapshot and watch commands share
//! the `common` module, which sets up logging, loads the configuration,
//! builds the backend client, and renders the console and JSON reports.
//!
//! Configuration is a TOML file (`hostsight.toml`) holding the backend URL,
//! refresh timing, the tracked dimensions, and the severity thresholds.

mod common;
mod config;
mod host;
mod init;
mod run;
mod snapshot;
mod validate;
mod watch;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use snapshot::{SnapshotArgs, snapshot};
pub use validate::{ValidateArgs, validate_config};
pub use watch::{WatchArgs, watch};
