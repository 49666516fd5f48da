//! JSON bodies exchanged with the `/predict` and `/explain` endpoints.
//!
//! Both endpoints accept `{"features": [...]}` with the seven model inputs in
//! wire order. `/predict` answers `{"prediction": [class, ...], "probability":
//! ...}` and `/explain` answers `{"explanation": "..."}`.

use inspection_core::{Explanation, FeatureVector, InferenceError, Prediction, Probability};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body shared by both endpoints.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    /// Model input in wire order.
    pub features: &'a FeatureVector,
}

/// `/predict` response body.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    /// One class per submitted sample; only the first is used. Classes are
    /// kept as raw JSON so `1.0` reads the same as `1`.
    #[serde(default)]
    pub prediction: Vec<Value>,

    /// Class probabilities, when the service reports them.
    #[serde(default)]
    pub probability: Option<Probability>,
}

/// `/explain` response body.
#[derive(Debug, Deserialize)]
pub struct ExplainResponse {
    /// Prose explanation of the model's decision.
    pub explanation: String,
}

/// Interpret a `/predict` body.
///
/// # Errors
/// Returns [`InferenceError::ParseError`] when `prediction` is empty.
pub fn convert_prediction(response: PredictResponse) -> Result<Prediction, InferenceError> {
    let class = response
        .prediction
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::ParseError {
            message: "prediction response contained no classes".to_owned(),
        })?;
    Ok(Prediction::from_raw(class, response.probability))
}

/// Interpret an `/explain` body.
#[must_use]
pub fn convert_explanation(response: ExplainResponse) -> Explanation {
    Explanation::new(response.explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspection_core::OpenStatus;
    use rstest::rstest;
    use serde_json::json;

    fn features() -> FeatureVector {
        FeatureVector {
            longitude: -74.006,
            latitude: 40.7128,
            score: 13.0,
            critical_flag: 0,
            cuisine: "Pizza".to_owned(),
            location_score: 0.0,
            inspection_year: 2023,
        }
    }

    #[test]
    fn serialise_request_body() {
        let features = features();
        let body = serde_json::to_value(InferenceRequest {
            features: &features,
        })
        .expect("should serialise");

        assert_eq!(
            body,
            json!({"features": [-74.006, 40.7128, 13.0, 0, "Pizza", 0.0, 2023]})
        );
    }

    #[test]
    fn deserialise_prediction_with_probabilities() {
        let json = r#"{"prediction": [1], "probability": [[0.2, 0.8]]}"#;

        let response: PredictResponse = serde_json::from_str(json).expect("should deserialise");
        let prediction = convert_prediction(response).expect("should convert");

        assert_eq!(prediction.status, OpenStatus::Opened);
        assert_eq!(
            prediction.probability.and_then(|p| p.opened()),
            Some(0.8)
        );
    }

    #[test]
    fn deserialise_prediction_without_probability() {
        let json = r#"{"prediction": [0, 1]}"#;

        let response: PredictResponse = serde_json::from_str(json).expect("should deserialise");
        let prediction = convert_prediction(response).expect("should convert");

        assert_eq!(prediction.class, 0);
        assert_eq!(prediction.status, OpenStatus::Closed);
        assert!(prediction.probability.is_none());
    }

    #[rstest]
    #[case(r#"{"prediction": [1.0]}"#, OpenStatus::Opened)]
    #[case(r#"{"prediction": [0.0]}"#, OpenStatus::Closed)]
    #[case(r#"{"prediction": ["1"]}"#, OpenStatus::Closed)]
    #[case(r#"{"prediction": [true]}"#, OpenStatus::Closed)]
    #[case(r#"{"prediction": [null, 1]}"#, OpenStatus::Closed)]
    fn decodes_classes_of_any_json_type(#[case] json: &str, #[case] expected: OpenStatus) {
        let response: PredictResponse = serde_json::from_str(json).expect("should deserialise");
        let prediction = convert_prediction(response).expect("should convert");

        assert_eq!(prediction.status, expected);
    }

    #[test]
    fn empty_prediction_is_a_parse_error() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"prediction": []}"#).expect("should deserialise");

        let err = convert_prediction(response).expect_err("should fail");

        assert!(matches!(err, InferenceError::ParseError { .. }));
    }

    #[test]
    fn deserialise_explanation() {
        let response: ExplainResponse =
            serde_json::from_str(r#"{"explanation": "Few critical violations."}"#)
                .expect("should deserialise");

        assert_eq!(
            convert_explanation(response).as_str(),
            "Few critical violations."
        );
    }
}
