//! Request and result types shared by inference services and sessions.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::{FeatureVector, Generation};

use super::error::InferenceError;

/// Which endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceKind {
    /// Binary open/closed prediction.
    Predict,
    /// Free-text explanation.
    Explain,
}

impl fmt::Display for InferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Predict => "predict",
            Self::Explain => "explain",
        })
    }
}

/// Predicted status of an establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenStatus {
    /// The model predicts class `1`.
    Opened,
    /// Any other class.
    Closed,
}

impl OpenStatus {
    /// Human-readable label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
        }
    }
}

/// Class probabilities as returned by the model, in whichever shape the
/// service chose.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Probability {
    /// A single probability.
    Scalar(f64),
    /// One probability per class.
    Classes(Vec<f64>),
    /// One row of class probabilities per sample.
    Samples(Vec<Vec<f64>>),
}

impl Probability {
    /// Probability of the `opened` class, when it can be identified.
    ///
    /// Two-class rows are read as `[closed, opened]`; a single value is taken
    /// as the probability of `opened`.
    #[must_use]
    pub fn opened(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Classes(classes) => opened_in_row(classes),
            Self::Samples(rows) => rows.first().and_then(|row| opened_in_row(row)),
        }
    }
}

fn opened_in_row(row: &[f64]) -> Option<f64> {
    match row {
        [value] | [_, value] => Some(*value),
        _ => None,
    }
}

/// Result of a prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Raw class returned by the model, as sent on the wire.
    pub class: Value,
    /// Status derived from `class`.
    pub status: OpenStatus,
    /// Class probabilities, if the service returned them.
    pub probability: Option<Probability>,
}

impl Prediction {
    /// Interpret a raw class: any number equal to `1` (including `1.0`)
    /// means opened, anything else closed. Strings and booleans are never
    /// coerced.
    #[must_use]
    pub fn from_raw(class: impl Into<Value>, probability: Option<Probability>) -> Self {
        let class = class.into();
        let status = if class.as_f64() == Some(1.0) {
            OpenStatus::Opened
        } else {
            OpenStatus::Closed
        };
        Self {
            class,
            status,
            probability,
        }
    }
}

/// Free-text explanation returned verbatim by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation(String);

impl Explanation {
    /// Wrap explanation text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Explanation text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful reply from either endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceReply {
    /// Reply from the prediction endpoint.
    Prediction(Prediction),
    /// Reply from the explanation endpoint.
    Explanation(Explanation),
}

/// A request ready to send, tagged with the selection it was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTicket {
    /// Selection generation at build time.
    pub generation: Generation,
    /// Target endpoint.
    pub kind: InferenceKind,
    /// Model input.
    pub features: FeatureVector,
}

impl InferenceTicket {
    /// Pair the ticket with the result of running it.
    #[must_use]
    pub fn complete(self, result: Result<InferenceReply, InferenceError>) -> InferenceOutcome {
        InferenceOutcome {
            generation: self.generation,
            kind: self.kind,
            result,
        }
    }
}

/// A finished request delivered back to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutcome {
    /// Selection generation the request was built for.
    pub generation: Generation,
    /// Endpoint that answered.
    pub kind: InferenceKind,
    /// Reply or failure.
    pub result: Result<InferenceReply, InferenceError>,
}
