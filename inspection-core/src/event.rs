//! Pointer events emitted by the map collaborator.
//!
//! Events mirror the payload a web map hands to layer listeners: the event
//! type, the features under the pointer, the pixel position, and the
//! geographic position of the pointer. A click with no features is a click
//! on the map background.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::Properties;

/// Kind of pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapEventKind {
    /// Pointer click.
    Click,
    /// Pointer entered the point layer.
    MouseEnter,
    /// Pointer left the point layer.
    MouseLeave,
}

/// Pixel position relative to the map container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

/// Geographic pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

/// Geometry of a feature under the pointer.
///
/// `coordinates` is optional because only point geometries carry a
/// coordinate pair directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureGeometry {
    /// GeoJSON geometry type, e.g. `"Point"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Position as `[longitude, latitude, ...]`.
    #[serde(default)]
    pub coordinates: Option<Vec<f64>>,
}

impl FeatureGeometry {
    /// Point geometry at `longitude`, `latitude`.
    #[must_use]
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: Some("Point".to_owned()),
            coordinates: Some(vec![longitude, latitude]),
        }
    }

    /// Position of a point geometry.
    ///
    /// Returns `None` when the coordinate member is missing, holds fewer than
    /// two values, or holds a non-finite value.
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        let coordinates = self.coordinates.as_deref()?;
        let (&x, &y) = (coordinates.first()?, coordinates.get(1)?);
        (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
    }
}

/// A rendered feature under the pointer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventFeature {
    /// Feature geometry, if the map supplied one.
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
    /// Feature properties.
    #[serde(default)]
    pub properties: Properties,
}

/// A pointer event on the map.
///
/// # Examples
///
/// ```
/// use inspection_core::{MapEvent, MapEventKind};
///
/// let event: MapEvent = serde_json::from_str(
///     r#"{
///         "type": "click",
///         "features": [{
///             "geometry": { "type": "Point", "coordinates": [-74.01, 40.71] },
///             "properties": { "name": "Joe's Pizza" }
///         }],
///         "point": { "x": 320.0, "y": 240.0 },
///         "lngLat": { "lng": -74.01, "lat": 40.71 }
///     }"#,
/// )?;
/// assert_eq!(event.kind, MapEventKind::Click);
/// assert!(event.hits_layer());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEvent {
    /// Interaction kind.
    #[serde(rename = "type")]
    pub kind: MapEventKind,
    /// Features of the point layer under the pointer; empty for background
    /// clicks.
    #[serde(default)]
    pub features: Vec<EventFeature>,
    /// Pixel position of the pointer.
    #[serde(default)]
    pub point: ScreenPoint,
    /// Geographic position of the pointer.
    #[serde(rename = "lngLat", default)]
    pub lng_lat: LngLat,
}

impl MapEvent {
    /// Click on `feature` at the given screen and pointer positions.
    #[must_use]
    pub fn click(feature: EventFeature, point: ScreenPoint, lng_lat: LngLat) -> Self {
        Self {
            kind: MapEventKind::Click,
            features: vec![feature],
            point,
            lng_lat,
        }
    }

    /// Click on the map background.
    #[must_use]
    pub const fn background_click(point: ScreenPoint, lng_lat: LngLat) -> Self {
        Self {
            kind: MapEventKind::Click,
            features: Vec::new(),
            point,
            lng_lat,
        }
    }

    /// Hover event of the given kind with no feature payload.
    #[must_use]
    pub const fn hover(kind: MapEventKind) -> Self {
        Self {
            kind,
            features: Vec::new(),
            point: ScreenPoint { x: 0.0, y: 0.0 },
            lng_lat: LngLat { lng: 0.0, lat: 0.0 },
        }
    }

    /// Whether the pointer is over at least one point-layer feature.
    #[must_use]
    pub fn hits_layer(&self) -> bool {
        !self.features.is_empty()
    }

    /// Topmost feature under the pointer.
    #[must_use]
    pub fn top_feature(&self) -> Option<&EventFeature> {
        self.features.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(vec![-74.01, 40.71]), Some(Coord { x: -74.01, y: 40.71 }))]
    #[case(Some(vec![-74.01, 40.71, 12.0]), Some(Coord { x: -74.01, y: 40.71 }))]
    #[case(Some(vec![-74.01]), None)]
    #[case(Some(vec![f64::NAN, 40.71]), None)]
    #[case(None, None)]
    fn position_requires_two_finite_values(
        #[case] coordinates: Option<Vec<f64>>,
        #[case] expected: Option<Coord<f64>>,
    ) {
        let geometry = FeatureGeometry {
            kind: Some("Point".to_owned()),
            coordinates,
        };
        assert_eq!(geometry.position(), expected);
    }

    #[rstest]
    fn background_click_has_no_features() {
        let json = r#"{ "type": "click", "point": { "x": 1.0, "y": 2.0 } }"#;
        let event: MapEvent = serde_json::from_str(json).expect("should deserialise");
        assert!(!event.hits_layer());
        assert_eq!(event.point, ScreenPoint { x: 1.0, y: 2.0 });
        assert_eq!(event.lng_lat, LngLat::default());
    }

    #[rstest]
    fn geometry_without_coordinates_deserialises() {
        let json = r#"{
            "type": "click",
            "features": [{ "geometry": { "type": "GeometryCollection" } }]
        }"#;
        let event: MapEvent = serde_json::from_str(json).expect("should deserialise");
        let geometry = event
            .top_feature()
            .and_then(|feature| feature.geometry.as_ref())
            .expect("geometry present");
        assert!(geometry.position().is_none());
    }

    #[rstest]
    #[case("mouseenter", MapEventKind::MouseEnter)]
    #[case("mouseleave", MapEventKind::MouseLeave)]
    fn hover_kinds_use_dom_names(#[case] raw: &str, #[case] expected: MapEventKind) {
        let json = format!(r#"{{ "type": "{raw}" }}"#);
        let event: MapEvent = serde_json::from_str(&json).expect("should deserialise");
        assert_eq!(event.kind, expected);
    }
}
