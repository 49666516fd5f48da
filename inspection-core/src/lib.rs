//! Core domain types for the inspection map.
//!
//! This crate turns a click on a map of food establishments into model input:
//! it unwraps the clicked coordinate next to the pointer, tracks the single
//! selected establishment and its popup, and builds the ordered feature
//! vector sent to a remote open/closed classifier. Network access lives
//! behind the [`InferenceService`] trait so the logic here stays pure and
//! synchronous.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coordinate;
pub mod establishment;
pub mod event;
pub mod features;
pub mod inference;
pub mod scorer;
pub mod selection;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use coordinate::{anchor_near_pointer, unwrap_longitude};
pub use establishment::{CriticalFlag, Establishment, Field, Properties};
pub use event::{EventFeature, FeatureGeometry, LngLat, MapEvent, MapEventKind, ScreenPoint};
pub use features::{
    FEATURE_COUNT, FeatureError, FeatureValue, FeatureVector, build_feature_vector,
};
pub use inference::{
    Explanation, InferenceError, InferenceKind, InferenceOutcome, InferenceReply,
    InferenceService, InferenceTicket, OpenStatus, Prediction, Probability,
};
pub use scorer::LocationScorer;
pub use selection::{
    Generation, PopupView, Selection, SelectionMachine, SelectionState, Transition,
};
pub use session::{CursorStyle, MapSession, Notice, RequestError};
