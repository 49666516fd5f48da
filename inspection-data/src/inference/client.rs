//! HTTP-based `InferenceService` talking to a JSON model server.
//!
//! [`HttpInferenceClient`] posts the feature vector to `{base}/predict` or
//! `{base}/explain` and converts transport failures into [`InferenceError`]
//! variants that carry the URL involved.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use inspection_core::{FeatureVector, InferenceService};
//! use inspection_data::inference::{HttpInferenceClient, HttpInferenceClientConfig};
//!
//! # async fn run(features: FeatureVector) -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpInferenceClientConfig::new("http://localhost:8000")
//!     .with_timeout(Duration::from_secs(10));
//! let client = HttpInferenceClient::with_config(config)?;
//!
//! let prediction = client.predict(&features).await?;
//! println!("{}", prediction.status.label());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use inspection_core::{
    Explanation, FeatureVector, InferenceError, InferenceKind, InferenceService, Prediction,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::wire::{
    ExplainResponse, InferenceRequest, PredictResponse, convert_explanation, convert_prediction,
};

/// Errors raised while building the HTTP client or its runtime.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for inference requests.
pub const DEFAULT_USER_AGENT: &str = "inspection-map/0.1";

/// Default model server location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpInferenceClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpInferenceClientConfig {
    /// Base URL of the model server (e.g. `"http://localhost:8000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpInferenceClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpInferenceClientConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Inference service reached over HTTP.
///
/// Requests are plain async `reqwest` calls, so the client must be polled
/// from inside a Tokio runtime. [`InferenceDispatcher`](super::InferenceDispatcher)
/// provides one for synchronous callers.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    client: Client,
    config: HttpInferenceClientConfig,
}

impl HttpInferenceClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpInferenceClientConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpInferenceClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpInferenceClientConfig {
        &self.config
    }

    /// Endpoint URL for `kind`, e.g. `{base_url}/predict`.
    fn endpoint_url(&self, kind: InferenceKind) -> String {
        format!("{}/{kind}", self.config.base_url.trim_end_matches('/'))
    }

    /// POST the features to the endpoint for `kind` and decode the reply.
    async fn post<T: DeserializeOwned>(
        &self,
        kind: InferenceKind,
        features: &FeatureVector,
    ) -> Result<T, InferenceError> {
        let url = self.endpoint_url(kind);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(&InferenceRequest { features })
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        response
            .json()
            .await
            .map_err(|err| InferenceError::ParseError {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to an `InferenceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> InferenceError {
        if error.is_timeout() {
            return InferenceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return InferenceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        InferenceError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl InferenceService for HttpInferenceClient {
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let response: PredictResponse = self.post(InferenceKind::Predict, features).await?;
        convert_prediction(response)
    }

    async fn explain(&self, features: &FeatureVector) -> Result<Explanation, InferenceError> {
        let response: ExplainResponse = self.post(InferenceKind::Explain, features).await?;
        Ok(convert_explanation(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://model.example.com", InferenceKind::Predict, "http://model.example.com/predict")]
    #[case("http://model.example.com/", InferenceKind::Explain, "http://model.example.com/explain")]
    #[case("http://host:8000/api//", InferenceKind::Predict, "http://host:8000/api/predict")]
    fn endpoint_url_joins_base_and_kind(
        #[case] base: &str,
        #[case] kind: InferenceKind,
        #[case] expected: &str,
    ) {
        let client = HttpInferenceClient::new(base).expect("client should build");

        assert_eq!(client.endpoint_url(kind), expected);
    }

    #[rstest]
    fn default_config_targets_local_server() {
        let config = HttpInferenceClientConfig::default();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpInferenceClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
