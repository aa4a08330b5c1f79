use crate::Result;
use crate::classify::ThresholdTable;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::sources::{DEFAULT_BASE_URL, Dimension};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "hostsight.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the visibility backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Pause between refresh ticks
    #[serde(default = "default_refresh_interval", with = "humantime_serde")]
    pub refresh_interval: Duration,

    /// Upper bound on a single backend request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Dimensions loaded on every tick
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<Dimension>,

    #[serde(default)]
    pub thresholds: ThresholdTable,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_dimensions() -> Vec<Dimension> {
    Dimension::all().collect()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading hostsight configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading hostsight configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or inconsistent
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).into_app_err_with(|| format!("base_url '{}' is not a valid URL", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("base_url '{}' must use http or https", self.base_url));
        }

        if self.refresh_interval.is_zero() {
            return Err(app_err!("refresh_interval must be greater than zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.dimensions.is_empty() {
            return Err(app_err!("dimensions must name at least one dimension"));
        }

        let mut seen = BTreeSet::new();
        for dimension in &self.dimensions {
            if !seen.insert(*dimension) {
                return Err(app_err!("dimension '{dimension}' is listed more than once"));
            }
        }

        self.thresholds.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
