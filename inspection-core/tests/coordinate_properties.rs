//! Property-based tests for longitude unwrapping and feature encoding.
//!
//! # Invariants tested
//!
//! - **Proximity:** the unwrapped longitude lies within 180° of the pointer.
//! - **Congruence:** the unwrapped longitude differs from the input by whole
//!   turns.
//! - **Arity:** feature vectors always serialise to seven elements.

use geo::Coord;
use inspection_core::{
    Establishment, FEATURE_COUNT, LocationScorer, Properties, build_feature_vector,
    unwrap_longitude,
};
use proptest::prelude::*;
use serde_json::json;

const TOLERANCE: f64 = 1e-6;

struct HalfScorer;

impl LocationScorer for HalfScorer {
    fn location_score(&self, _position: Coord<f64>) -> f64 {
        0.5
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: the result is never more than half a turn from the pointer.
    #[test]
    fn unwrapped_longitude_is_near_pointer(
        longitude in -1080.0_f64..1080.0,
        pointer in -540.0_f64..540.0,
    ) {
        let unwrapped = unwrap_longitude(longitude, pointer);
        prop_assert!(
            (unwrapped - pointer).abs() <= 180.0 + TOLERANCE,
            "|{unwrapped} - {pointer}| exceeds half a turn"
        );
    }

    /// Property: the result is congruent to the input modulo 360°.
    #[test]
    fn unwrapped_longitude_is_congruent(
        longitude in -1080.0_f64..1080.0,
        pointer in -540.0_f64..540.0,
    ) {
        let unwrapped = unwrap_longitude(longitude, pointer);
        let turns = (unwrapped - longitude) / 360.0;
        prop_assert!(
            (turns - turns.round()).abs() < TOLERANCE,
            "{unwrapped} is not a whole number of turns from {longitude}"
        );
    }

    /// Property: any critical flag text yields a seven-element vector with a
    /// code in `{-1, 0, 1}`.
    #[test]
    fn feature_vector_arity_is_fixed(flag in ".{0,16}", score in -100.0_f64..100.0) {
        let properties: Properties = [
            ("critical_flag".to_owned(), json!(flag)),
            ("score".to_owned(), json!(score.to_string())),
            ("inspection_date".to_owned(), json!("2024-05-01")),
        ]
        .into_iter()
        .collect();
        let place = Establishment::from_properties(Coord { x: 1.0, y: 2.0 }, &properties);

        let features = build_feature_vector(&place, &HalfScorer).expect("features should build");
        let encoded = serde_json::to_value(&features).expect("serialise");

        prop_assert_eq!(encoded.as_array().map(Vec::len), Some(FEATURE_COUNT));
        prop_assert!((-1..=1).contains(&features.critical_flag));
    }
}
