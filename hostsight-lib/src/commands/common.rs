//! Common processing logic shared between the snapshot and watch commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::refresh::{DashboardState, SchedulerSettings};
use crate::reports::{generate_console, generate_json};
use crate::sources::SourceClient;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use clap::ValueEnum;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the snapshot and watch commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Base URL of the visibility backend (overrides the configuration file)
    #[arg(long, value_name = "URL", env = "HOSTSIGHT_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to configuration file (default is `hostsight.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Write the dashboard state to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Show the dashboard on the console. If omitted, console output is shown only when no JSON report is written.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,

    /// Exit with status code 1 if any dimension is classified as critical
    #[arg(long)]
    pub error_if_critical: bool,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    pub client: SourceClient,
    host: &'a mut H,
    color: ColorMode,
    console: bool,
    json: Option<Utf8PathBuf>,
    error_if_critical: bool,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger, configuration, and backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the client cannot be created
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
        let base_url = args.base_url.as_deref().unwrap_or(&config.base_url);
        let client = SourceClient::new(base_url, config.request_timeout)?;

        log::debug!(target: LOG_TARGET, "Loading {} dimension(s) from {}", config.dimensions.len(), client.base_url());

        Ok(Self {
            config,
            client,
            host,
            color: args.color,
            console: args.console,
            json: args.json.clone(),
            error_if_critical: args.error_if_critical,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .init();
    }

    /// The refresh settings described by the configuration
    pub fn settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval: self.config.refresh_interval,
            dimensions: self.config.dimensions.clone(),
            thresholds: self.config.thresholds.clone(),
        }
    }

    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Render `state` to every requested output
    ///
    /// # Errors
    ///
    /// Returns an error if a report cannot be generated or written
    pub fn report(&mut self, state: &DashboardState) -> Result<()> {
        // Show console output if --console is set or no other report is being generated
        if self.console || self.json.is_none() {
            let mut console_output = String::new();
            generate_console(state, self.color.use_colors(), &mut console_output)?;
            let _ = write!(self.host.output(), "{console_output}");
        }

        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(state, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        }

        Ok(())
    }

    /// Fail when --error-if-critical is set and `state` holds a critical dimension
    ///
    /// # Errors
    ///
    /// Returns an error if any loaded dimension is classified as critical
    pub fn check_critical(&self, state: &DashboardState) -> Result<()> {
        if !self.error_if_critical {
            return Ok(());
        }

        let critical = state.view_model.as_ref().map_or(0, |view_model| view_model.critical_dimension_count());
        if critical > 0 {
            return Err(app_err!("{critical} dimension(s) were classified as critical"));
        }

        Ok(())
    }
}
