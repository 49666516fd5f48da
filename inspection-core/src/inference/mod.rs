//! Ask a remote model about the selected establishment.
//!
//! The `InferenceService` trait abstracts the remote prediction and
//! explanation endpoints. Callers hand it a
//! [`FeatureVector`](crate::FeatureVector) and receive either an
//! open/closed [`Prediction`] or a free-text [`Explanation`].
//!
//! Requests are tagged with the selection [`Generation`](crate::Generation)
//! they were built for via [`InferenceTicket`], so results that complete after
//! the selection changed can be recognised and dropped.

mod error;
mod service;
mod types;

pub use error::InferenceError;
pub use service::InferenceService;
pub use types::{
    Explanation, InferenceKind, InferenceOutcome, InferenceReply, InferenceTicket, OpenStatus,
    Prediction, Probability,
};
