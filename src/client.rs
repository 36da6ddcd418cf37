pub(crate) mod feedback;
pub(crate) mod inference;

use std::time::Duration;

use crate::foundation::error::{ScopeError, ScopeResult};

/// Default base URL of the classifier service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Where the classifier service lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EndpointOpts {
    /// Base URL, without a trailing path (`/predict` and `/feedback` are appended).
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EndpointOpts {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: 10_000,
        }
    }
}

impl EndpointOpts {
    /// Endpoint at `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Absolute URL of `path` below the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Reject empty URLs, non-http schemes and a zero timeout.
    pub fn validate(&self) -> ScopeResult<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ScopeError::validation(format!(
                "endpoint base_url must start with http:// or https:// (got '{base}')"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ScopeError::validation("endpoint timeout_ms must be > 0"));
        }
        Ok(())
    }

    pub(crate) fn http_client(&self) -> ScopeResult<reqwest::Client> {
        self.validate()?;
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| ScopeError::Other(anyhow::Error::new(e).context("build http client")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/client/endpoint.rs"]
mod tests;
