//! Assemble the ordered feature vector consumed by the inference service.
//!
//! The wire order is a protocol contract with the remote model:
//!
//! | index | feature          | type    |
//! |-------|------------------|---------|
//! | 0     | longitude        | float   |
//! | 1     | latitude         | float   |
//! | 2     | inspection score | float   |
//! | 3     | critical flag    | integer |
//! | 4     | cuisine          | string  |
//! | 5     | location score   | float   |
//! | 6     | inspection year  | integer |
//!
//! Values that cannot be parsed are rejected with a [`FeatureError`] instead
//! of travelling to the service as `NaN`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;

use crate::{Establishment, Field, LocationScorer};

/// Number of elements in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 7;

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];
// `%b` also accepts full month names when parsing.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d %Y", "%b %d, %Y"];

/// Errors returned by [`build_feature_vector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// A property required for inference was absent.
    #[error("{} is required to build features", .field.key())]
    MissingField {
        /// The absent property.
        field: Field,
    },
    /// The inspection score is not a finite number.
    #[error("inspection score {raw:?} is not a finite number")]
    InvalidScore {
        /// Raw property text.
        raw: String,
    },
    /// The inspection date could not be read as a calendar date.
    #[error("inspection date {raw:?} is not a recognised date")]
    InvalidInspectionDate {
        /// Raw property text.
        raw: String,
    },
    /// The location scorer produced a non-finite value.
    #[error("location score is not finite")]
    InvalidLocationScore,
}

/// One value of a [`FeatureVector`] in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Floating-point feature.
    Float(f64),
    /// Integer feature.
    Integer(i64),
    /// Categorical feature sent as raw text.
    Text(String),
}

/// Ordered model input built from a selected establishment.
///
/// Serialises as a seven-element JSON array in the order documented at the
/// module level.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Raw longitude of the establishment.
    pub longitude: f64,
    /// Raw latitude of the establishment.
    pub latitude: f64,
    /// Parsed inspection score.
    pub score: f64,
    /// Encoded critical flag in `{-1, 0, 1}`.
    pub critical_flag: i8,
    /// Cuisine category, passed through unchanged.
    pub cuisine: String,
    /// Location-risk score in `0.0..=1.0`.
    pub location_score: f64,
    /// Calendar year of the inspection.
    pub inspection_year: i32,
}

impl FeatureVector {
    /// Values in wire order.
    #[must_use]
    pub fn values(&self) -> [FeatureValue; FEATURE_COUNT] {
        [
            FeatureValue::Float(self.longitude),
            FeatureValue::Float(self.latitude),
            FeatureValue::Float(self.score),
            FeatureValue::Integer(i64::from(self.critical_flag)),
            FeatureValue::Text(self.cuisine.clone()),
            FeatureValue::Float(self.location_score),
            FeatureValue::Integer(i64::from(self.inspection_year)),
        ]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(FEATURE_COUNT)?;
        tuple.serialize_element(&self.longitude)?;
        tuple.serialize_element(&self.latitude)?;
        tuple.serialize_element(&self.score)?;
        tuple.serialize_element(&self.critical_flag)?;
        tuple.serialize_element(&self.cuisine)?;
        tuple.serialize_element(&self.location_score)?;
        tuple.serialize_element(&self.inspection_year)?;
        tuple.end()
    }
}

/// Build the feature vector for `establishment`.
///
/// The location score is delegated to `scorer` using the establishment's raw
/// coordinates. A missing cuisine is sent as an empty category.
///
/// # Errors
///
/// Returns [`FeatureError`] when the score or inspection date is missing or
/// unparseable, or when the scorer returns a non-finite value.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use inspection_core::{Establishment, LocationScorer, build_feature_vector};
///
/// struct Zero;
/// impl LocationScorer for Zero {
///     fn location_score(&self, _position: Coord<f64>) -> f64 { 0.0 }
/// }
///
/// let mut place = Establishment::from_properties(Coord { x: -74.0, y: 40.7 }, &Default::default());
/// place.score = Some("13".into());
/// place.inspection_date = Some("2023-02-16".into());
/// let features = build_feature_vector(&place, &Zero)?;
/// assert_eq!(features.inspection_year, 2023);
/// assert_eq!(features.critical_flag, -1);
/// # Ok::<(), inspection_core::FeatureError>(())
/// ```
pub fn build_feature_vector(
    establishment: &Establishment,
    scorer: &dyn LocationScorer,
) -> Result<FeatureVector, FeatureError> {
    let score = parse_score(establishment.get(Field::Score))?;
    let inspection_year = inspection_year(establishment.get(Field::InspectionDate))?;
    let location_score = scorer.location_score(establishment.coordinates);
    if !location_score.is_finite() {
        return Err(FeatureError::InvalidLocationScore);
    }
    Ok(FeatureVector {
        longitude: establishment.coordinates.x,
        latitude: establishment.coordinates.y,
        score,
        critical_flag: establishment.critical_flag().code(),
        cuisine: establishment
            .get(Field::Cuisine)
            .unwrap_or_default()
            .to_owned(),
        location_score,
        inspection_year,
    })
}

/// Parse an inspection score.
///
/// # Errors
///
/// Returns [`FeatureError::MissingField`] when absent and
/// [`FeatureError::InvalidScore`] when the text is not a finite number.
pub fn parse_score(raw: Option<&str>) -> Result<f64, FeatureError> {
    let text = raw.ok_or(FeatureError::MissingField {
        field: Field::Score,
    })?;
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FeatureError::InvalidScore {
            raw: text.to_owned(),
        })
}

/// Extract the calendar year from an inspection date.
///
/// Accepts RFC 3339 timestamps, ISO-8601 date-times without an offset,
/// `YYYY-MM-DD`, `MM/DD/YYYY` or `YYYY/MM/DD` dates, month-name dates such as
/// `Feb 16 2023` or `February 16, 2023`, and a bare four-digit year.
///
/// # Errors
///
/// Returns [`FeatureError::MissingField`] when absent and
/// [`FeatureError::InvalidInspectionDate`] when no format matches.
pub fn inspection_year(raw: Option<&str>) -> Result<i32, FeatureError> {
    let text = raw.ok_or(FeatureError::MissingField {
        field: Field::InspectionDate,
    })?;
    parse_calendar_date(text.trim())
        .map(|date| date.year())
        .ok_or_else(|| FeatureError::InvalidInspectionDate {
            raw: text.to_owned(),
        })
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })
        .or_else(|| bare_year(text))
}

fn bare_year(text: &str) -> Option<NaiveDate> {
    if text.len() != 4 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Properties;
    use crate::test_support::FixedLocationScorer;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn establishment() -> Establishment {
        let properties: Properties = [
            ("cuisine", json!("Pizza")),
            ("critical_flag", json!("Not Critical")),
            ("score", json!("13")),
            ("inspection_date", json!("2023-02-16T00:00:00.000")),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();
        Establishment::from_properties(
            Coord {
                x: -74.006,
                y: 40.7128,
            },
            &properties,
        )
    }

    #[rstest]
    fn builds_vector_in_wire_order(establishment: Establishment) {
        let features = build_feature_vector(&establishment, &FixedLocationScorer::new(0.25))
            .expect("features should build");

        let encoded = serde_json::to_value(&features).expect("serialise features");
        assert_eq!(
            encoded,
            json!([-74.006, 40.7128, 13.0, 0, "Pizza", 0.25, 2023])
        );
        assert_eq!(features.values().len(), FEATURE_COUNT);
    }

    #[rstest]
    fn missing_cuisine_is_sent_as_empty_category(mut establishment: Establishment) {
        establishment.cuisine = None;
        let features = build_feature_vector(&establishment, &FixedLocationScorer::new(0.0))
            .expect("features should build");
        assert_eq!(features.cuisine, "");
    }

    #[rstest]
    #[case(Some("13"), Ok(13.0))]
    #[case(Some(" 7.5 "), Ok(7.5))]
    #[case(Some("-2"), Ok(-2.0))]
    #[case(Some("abc"), Err(FeatureError::InvalidScore { raw: "abc".into() }))]
    #[case(Some("NaN"), Err(FeatureError::InvalidScore { raw: "NaN".into() }))]
    #[case(Some("inf"), Err(FeatureError::InvalidScore { raw: "inf".into() }))]
    #[case(None, Err(FeatureError::MissingField { field: Field::Score }))]
    fn score_parsing_rejects_non_numbers(
        #[case] raw: Option<&str>,
        #[case] expected: Result<f64, FeatureError>,
    ) {
        assert_eq!(parse_score(raw), expected);
    }

    #[rstest]
    #[case("2023-02-16T00:00:00.000", 2023)]
    #[case("2022-11-03T10:15:00Z", 2022)]
    #[case("2021-06-01T09:00:00", 2021)]
    #[case("2019-12-31", 2019)]
    #[case("04/25/2018", 2018)]
    #[case("Feb 16 2023", 2023)]
    #[case("February 16, 2023", 2023)]
    #[case("2023", 2023)]
    #[case(" 2017 ", 2017)]
    fn extracts_inspection_year(#[case] raw: &str, #[case] expected: i32) {
        assert_eq!(inspection_year(Some(raw)), Ok(expected));
    }

    #[rstest]
    #[case("not a date")]
    #[case("1900-13-45")]
    #[case("")]
    #[case("202")]
    #[case("20231")]
    #[case("Feb 30 2023")]
    fn rejects_unparseable_dates(#[case] raw: &str) {
        assert!(matches!(
            inspection_year(Some(raw)),
            Err(FeatureError::InvalidInspectionDate { .. })
        ));
    }

    #[rstest]
    fn missing_date_is_reported(mut establishment: Establishment) {
        establishment.inspection_date = None;
        let err = build_feature_vector(&establishment, &FixedLocationScorer::new(0.0))
            .expect_err("missing date should fail");
        assert_eq!(
            err,
            FeatureError::MissingField {
                field: Field::InspectionDate
            }
        );
    }

    #[rstest]
    fn non_finite_location_score_is_rejected(establishment: Establishment) {
        let err = build_feature_vector(&establishment, &FixedLocationScorer::new(f64::NAN))
            .expect_err("NaN location score should fail");
        assert_eq!(err, FeatureError::InvalidLocationScore);
    }
}
