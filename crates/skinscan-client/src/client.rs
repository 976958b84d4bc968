//! Classifier HTTP client.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use skinscan_core::classify::{self, HEALTH_PATH, PREDICT_PATH};
use skinscan_core::{Classification, HealthResponse, PredictRequest};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable holding the base URL.
pub const API_URL_ENV: &str = "SKINSCAN_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const API_TIMEOUT_ENV: &str = "SKINSCAN_API_TIMEOUT";

/// Configuration for [`ClassifierClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Base URL of the classifier service, without a trailing path.
    pub base_url: String,
    /// Whole-request timeout. Ignored in the browser, where fetch has no
    /// timeout.
    pub timeout: Option<Duration>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeout: None,
        }
    }
}

impl ClassifierConfig {
    /// Config pointing at `base_url` with no timeout.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Create config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(API_URL_ENV)
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            timeout: lookup(API_TIMEOUT_ENV)
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Client for the classifier service.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: Client,
    config: ClassifierConfig,
}

impl ClassifierClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client cannot be built.
    pub fn new(config: ClassifierConfig) -> ClientResult<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClassifierConfig::from_env())
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an exported image given as a `data:` URL.
    ///
    /// Exactly one request is made; there are no retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the request fails in transit,
    /// and [`ClientError::Submit`] for non-JSON, malformed or
    /// unsuccessful responses.
    pub async fn predict(&self, image_data_url: &str) -> ClientResult<Classification> {
        let url = self.config.url(PREDICT_PATH);
        debug!(%url, bytes = image_data_url.len(), "sending image for classification");

        let response = self
            .http
            .post(&url)
            .json(&PredictRequest {
                image: image_data_url.to_owned(),
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(classify::interpret_response(
            status,
            content_type.as_deref(),
            &body,
        )?)
    }

    /// Query the service health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] on transport or decoding failure
    /// and [`ClientError::Status`] for a non-success status.
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let url = self.config.url(HEALTH_PATH);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            warn!("classifier health check failed: {}", response.status());
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn config_from_lookup() {
        let config = ClassifierConfig::from_lookup(|key| match key {
            API_URL_ENV => Some("https://scan.example".to_owned()),
            API_TIMEOUT_ENV => Some("30".to_owned()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://scan.example");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn config_ignores_empty_and_invalid_values() {
        let config = ClassifierConfig::from_lookup(|key| match key {
            API_URL_ENV => Some(String::new()),
            API_TIMEOUT_ENV => Some("soon".to_owned()),
            _ => None,
        });
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = ClassifierConfig::with_base_url("http://host:5000/");
        assert_eq!(config.url(PREDICT_PATH), "http://host:5000/api/predict");
        let config = ClassifierConfig::with_base_url("http://host:5000");
        assert_eq!(config.url(HEALTH_PATH), "http://host:5000/api/health");
    }
}
