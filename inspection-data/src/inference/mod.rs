//! Remote inference over HTTP.
//!
//! [`HttpInferenceClient`] implements
//! [`inspection_core::InferenceService`] against a JSON model server exposing
//! `POST /predict` and `POST /explain`. [`InferenceDispatcher`] runs requests
//! in the background so a synchronous event loop never waits on the network.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use inspection_data::inference::{
//!     HttpInferenceClient, HttpInferenceClientConfig, InferenceDispatcher,
//! };
//!
//! let config = HttpInferenceClientConfig::new("http://localhost:8000")
//!     .with_user_agent("my-app/1.0");
//! let client = HttpInferenceClient::with_config(config)?;
//! let dispatcher = InferenceDispatcher::new(Arc::new(client))?;
//! assert_eq!(dispatcher.pending(), 0);
//! # Ok::<(), inspection_data::inference::ClientBuildError>(())
//! ```

mod client;
mod dispatch;
mod wire;

#[doc(hidden)]
pub mod test_support;

pub use client::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpInferenceClient,
    HttpInferenceClientConfig,
};
pub use dispatch::InferenceDispatcher;
pub use wire::{ExplainResponse, InferenceRequest, PredictResponse};
