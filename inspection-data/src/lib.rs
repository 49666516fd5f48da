//! Transport adapters for the inspection map.
//!
//! Responsibilities:
//! - Talk to the remote open/closed model over HTTP.
//! - Run requests off the event-loop thread and hand outcomes back.
//!
//! Boundaries:
//! - Do not encode selection or feature rules (live in `inspection-core`).
//! - Never block the caller in [`inference::InferenceDispatcher::dispatch`].

#![forbid(unsafe_code)]

pub mod inference;

pub use inference::{
    ClientBuildError, HttpInferenceClient, HttpInferenceClientConfig, InferenceDispatcher,
};
