//! Test utilities for inference services.
//!
//! This module provides [`StubInferenceService`], a deterministic test double
//! for [`InferenceService`] that returns pre-configured replies without
//! making HTTP requests.

use std::sync::Mutex;

use async_trait::async_trait;
use inspection_core::{Explanation, FeatureVector, InferenceError, InferenceService, Prediction};

/// Stub `InferenceService` for testing.
///
/// Every request is recorded so tests can inspect the features that would
/// have been sent.
///
/// # Example
///
/// ```
/// use inspection_core::{Explanation, Prediction};
/// use inspection_data::inference::test_support::StubInferenceService;
///
/// let service = StubInferenceService::with_reply(
///     Prediction::from_raw(1, None),
///     Explanation::new("clean record"),
/// );
/// assert!(service.requests().is_empty());
/// ```
#[derive(Debug)]
pub struct StubInferenceService {
    response: StubResponse,
    requests: Mutex<Vec<FeatureVector>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Reply {
        prediction: Prediction,
        explanation: Explanation,
    },
    Error(InferenceError),
}

impl StubInferenceService {
    /// Create a service answering every request successfully.
    #[must_use]
    pub fn with_reply(prediction: Prediction, explanation: Explanation) -> Self {
        Self::from_response(StubResponse::Reply {
            prediction,
            explanation,
        })
    }

    /// Create a service failing every request with `error`.
    #[must_use]
    pub fn with_error(error: InferenceError) -> Self {
        Self::from_response(StubResponse::Error(error))
    }

    /// Create a service predicting `opened` with a canned explanation.
    #[must_use]
    pub fn opened() -> Self {
        Self::with_reply(
            Prediction::from_raw(1, None),
            Explanation::new("No critical violations on record."),
        )
    }

    const fn from_response(response: StubResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Features received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<FeatureVector> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, features: &FeatureVector) {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(features.clone());
        }
    }
}

#[async_trait]
impl InferenceService for StubInferenceService {
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        self.record(features);
        match &self.response {
            StubResponse::Reply { prediction, .. } => Ok(prediction.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    async fn explain(&self, features: &FeatureVector) -> Result<Explanation, InferenceError> {
        self.record(features);
        match &self.response {
            StubResponse::Reply { explanation, .. } => Ok(explanation.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
