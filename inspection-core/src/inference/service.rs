//! Inference service trait for prediction and explanation requests.

use async_trait::async_trait;

use crate::FeatureVector;

use super::error::InferenceError;
use super::types::{Explanation, InferenceKind, InferenceReply, Prediction};

/// Remote model answering questions about a feature vector.
///
/// Calls are asynchronous so issuing one never blocks the event loop that
/// owns the selection. Implementations must be `Send + Sync` because
/// requests run on background tasks.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use inspection_core::{
///     Explanation, FeatureVector, InferenceError, InferenceService, OpenStatus, Prediction,
/// };
///
/// struct AlwaysOpen;
///
/// #[async_trait]
/// impl InferenceService for AlwaysOpen {
///     async fn predict(&self, _features: &FeatureVector) -> Result<Prediction, InferenceError> {
///         Ok(Prediction::from_raw(1, None))
///     }
///
///     async fn explain(&self, _features: &FeatureVector) -> Result<Explanation, InferenceError> {
///         Ok(Explanation::new("clean record"))
///     }
/// }
///
/// assert_eq!(Prediction::from_raw(1, None).status, OpenStatus::Opened);
/// ```
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Ask the model whether the establishment is open.
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError>;

    /// Ask the model to explain its decision in prose.
    async fn explain(&self, features: &FeatureVector) -> Result<Explanation, InferenceError>;

    /// Run the request of the given `kind`.
    async fn run(
        &self,
        kind: InferenceKind,
        features: &FeatureVector,
    ) -> Result<InferenceReply, InferenceError> {
        match kind {
            InferenceKind::Predict => self.predict(features).await.map(InferenceReply::Prediction),
            InferenceKind::Explain => self.explain(features).await.map(InferenceReply::Explanation),
        }
    }
}
