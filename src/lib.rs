//! Facade crate for the food-inspection map.
//!
//! This crate re-exports the selection-to-feature pipeline from
//! `inspection-core`, the domain-table scorer, and (behind the default `http`
//! feature) the HTTP inference client.

#![forbid(unsafe_code)]

pub use inspection_core::{
    CursorStyle, Establishment, FeatureError, FeatureVector, InferenceError, InferenceKind,
    InferenceOutcome, InferenceService, InferenceTicket, LocationScorer, MapEvent, MapSession,
    Notice, OpenStatus, Prediction, RequestError, SelectionState, Transition,
    build_feature_vector, unwrap_longitude,
};
pub use inspection_scorer::{DomainTableError, DomainTableScorer, FeatureDomainTable};

#[cfg(feature = "http")]
pub use inspection_data::{
    ClientBuildError, HttpInferenceClient, HttpInferenceClientConfig, InferenceDispatcher,
};
