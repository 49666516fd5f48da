//! Deterministic doubles and event builders used by unit and behaviour tests.

use geo::Coord;
use serde_json::Value;

use crate::{EventFeature, FeatureGeometry, LngLat, LocationScorer, MapEvent, ScreenPoint};

/// `LocationScorer` returning the same raw value for every position.
///
/// The value is not sanitised so tests can feed non-finite scores through the
/// feature builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocationScorer {
    score: f64,
}

impl FixedLocationScorer {
    /// Scorer that always yields `score`.
    #[must_use]
    pub const fn new(score: f64) -> Self {
        Self { score }
    }
}

impl Default for FixedLocationScorer {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LocationScorer for FixedLocationScorer {
    fn location_score(&self, _position: Coord<f64>) -> f64 {
        self.score
    }
}

/// Point feature at `longitude`, `latitude` carrying `properties`.
#[must_use]
pub fn point_feature<'a, I>(longitude: f64, latitude: f64, properties: I) -> EventFeature
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    EventFeature {
        geometry: Some(FeatureGeometry::point(longitude, latitude)),
        properties: properties
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect(),
    }
}

/// Click on `feature` with the pointer at `pointer_longitude`.
#[must_use]
pub fn click_on(feature: EventFeature, pointer_longitude: f64, point: ScreenPoint) -> MapEvent {
    let latitude = feature
        .geometry
        .as_ref()
        .and_then(FeatureGeometry::position)
        .map_or(0.0, |position| position.y);
    MapEvent::click(
        feature,
        point,
        LngLat {
            lng: pointer_longitude,
            lat: latitude,
        },
    )
}

/// Click on the map background.
#[must_use]
pub const fn background_click() -> MapEvent {
    MapEvent::background_click(ScreenPoint { x: 5.0, y: 5.0 }, LngLat { lng: 0.0, lat: 0.0 })
}
