use super::{Dimension, LoadError};
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde_json::Value;
use url::Url;

const LOG_TARGET: &str = "    sources";

/// Where the visibility backend listens unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Something that can produce the raw payload of a dimension.
pub trait MetricSource: Send + Sync {
    /// Fetch and parse the body served for `dimension`.
    fn fetch(&self, dimension: Dimension) -> impl Future<Output = Result<Value, LoadError>> + Send;
}

/// HTTP client for the visibility backend.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: reqwest::Client,
    base_url: String,
}

impl SourceClient {
    /// Create a client for the backend at `base_url`, bounding every request by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).into_app_err_with(|| format!("invalid data source URL '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(app_err!("data source URL '{base_url}' must use http or https"));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hostsight/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the endpoint serving `dimension`.
    #[must_use]
    pub fn endpoint(&self, dimension: Dimension) -> String {
        format!("{}{}", self.base_url, dimension.path())
    }

    async fn get(&self, dimension: Dimension) -> Result<Value, LoadError> {
        let url = self.endpoint(dimension);
        log::info!(target: LOG_TARGET, "Querying '{url}' for {dimension} visibility");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .into_app_err_with(|| format!("sending request to '{url}'"))
            .map_err(|e| LoadError::transport(dimension, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::transport(dimension, app_err!("'{url}' responded with HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .into_app_err_with(|| format!("reading response body from '{url}'"))
            .map_err(|e| LoadError::transport(dimension, e))?;

        log::debug!(target: LOG_TARGET, "Received {} bytes from '{url}'", body.len());

        serde_json::from_str(&body)
            .into_app_err_with(|| format!("parsing JSON returned by '{url}'"))
            .map_err(|e| LoadError::shape(dimension, e))
    }
}

impl MetricSource for SourceClient {
    fn fetch(&self, dimension: Dimension) -> impl Future<Output = Result<Value, LoadError>> + Send {
        self.get(dimension)
    }
}
