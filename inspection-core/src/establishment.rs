//! The food establishment captured when a point on the map is selected.
//!
//! Properties arrive from the map layer as loosely typed key/value pairs.
//! [`Establishment::from_properties`] keeps absent values as `None` so that
//! feature building can tell "missing" apart from real text; display
//! fallbacks such as `"No name available"` are produced only when rendering.

use std::borrow::Cow;
use std::collections::HashMap;

use geo::Coord;
use serde_json::Value;

/// Raw property bag attached to a clicked map feature.
pub type Properties = HashMap<String, Value>;

/// Inspection outcome severity as recorded by the health department.
///
/// Parsing is an exact, case-sensitive match; anything else (including a
/// missing value) is [`CriticalFlag::Unrecognised`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriticalFlag {
    /// `"Critical"`.
    Critical,
    /// `"Not Critical"`.
    NotCritical,
    /// `"Not Applicable"`.
    NotApplicable,
    /// Missing or outside the known categories.
    Unrecognised,
}

impl CriticalFlag {
    /// Classify a raw property value.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspection_core::CriticalFlag;
    ///
    /// assert_eq!(CriticalFlag::parse(Some("Critical")), CriticalFlag::Critical);
    /// assert_eq!(CriticalFlag::parse(Some("critical")), CriticalFlag::Unrecognised);
    /// assert_eq!(CriticalFlag::parse(None), CriticalFlag::Unrecognised);
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Critical") => Self::Critical,
            Some("Not Critical") => Self::NotCritical,
            Some("Not Applicable") => Self::NotApplicable,
            _ => Self::Unrecognised,
        }
    }

    /// Numeric code sent to the inference service.
    ///
    /// `Critical` encodes as `1`, `Not Critical` as `0`, and both
    /// `Not Applicable` and unrecognised values as `-1`.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Critical => 1,
            Self::NotCritical => 0,
            Self::NotApplicable | Self::Unrecognised => -1,
        }
    }
}

/// Property keys read from a clicked feature, paired with the noun used in
/// display fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Establishment name.
    Name,
    /// Street address.
    Address,
    /// Phone number.
    Phone,
    /// Free-text cuisine category.
    Cuisine,
    /// Date of the latest inspection.
    InspectionDate,
    /// Action taken by the inspector.
    Action,
    /// Violation code.
    ViolationCode,
    /// Violation description.
    ViolationDescription,
    /// Critical flag.
    CriticalFlag,
    /// Inspection score.
    Score,
}

impl Field {
    /// Property key in the map layer's schema.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Cuisine => "cuisine",
            Self::InspectionDate => "inspection_date",
            Self::Action => "action",
            Self::ViolationCode => "violation_code",
            Self::ViolationDescription => "violation_description",
            Self::CriticalFlag => "critical_flag",
            Self::Score => "score",
        }
    }

    /// Text shown when the property is absent, e.g. `"No phone available"`.
    #[must_use]
    pub const fn fallback(self) -> &'static str {
        match self {
            Self::Name => "No name available",
            Self::Address => "No address available",
            Self::Phone => "No phone available",
            Self::Cuisine => "No cuisine available",
            Self::InspectionDate => "No inspection date available",
            Self::Action => "No action available",
            Self::ViolationCode => "No violation code available",
            Self::ViolationDescription => "No violation description available",
            Self::CriticalFlag => "No critical flag available",
            Self::Score => "No score available",
        }
    }
}

/// A food establishment selected on the map.
///
/// Built fresh on every qualifying click and replaced wholesale on the next
/// one; it is never edited field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Establishment {
    /// Raw geometry coordinates (`x = longitude`, `y = latitude`).
    pub coordinates: Coord<f64>,
    /// Establishment name.
    pub name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-text cuisine category.
    pub cuisine: Option<String>,
    /// Inspection date as published.
    pub inspection_date: Option<String>,
    /// Inspector action.
    pub action: Option<String>,
    /// Violation code.
    pub violation_code: Option<String>,
    /// Violation description.
    pub violation_description: Option<String>,
    /// Raw critical flag text.
    pub critical_flag: Option<String>,
    /// Inspection score as a numeric string.
    pub score: Option<String>,
}

impl Establishment {
    /// Extract an establishment from a feature's coordinates and properties.
    ///
    /// Strings are trimmed; numbers and booleans are rendered as text; `null`
    /// and blank values count as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use inspection_core::{Establishment, Properties};
    /// use serde_json::json;
    ///
    /// let properties: Properties = [
    ///     ("name".to_owned(), json!("Joe's Pizza")),
    ///     ("score".to_owned(), json!(13)),
    /// ]
    /// .into_iter()
    /// .collect();
    /// let place = Establishment::from_properties(Coord { x: -74.0, y: 40.7 }, &properties);
    /// assert_eq!(place.name.as_deref(), Some("Joe's Pizza"));
    /// assert_eq!(place.score.as_deref(), Some("13"));
    /// assert!(place.phone.is_none());
    /// ```
    #[must_use]
    pub fn from_properties(coordinates: Coord<f64>, properties: &Properties) -> Self {
        let read = |field: Field| property_text(properties, field.key());
        Self {
            coordinates,
            name: read(Field::Name),
            address: read(Field::Address),
            phone: read(Field::Phone),
            cuisine: read(Field::Cuisine),
            inspection_date: read(Field::InspectionDate),
            action: read(Field::Action),
            violation_code: read(Field::ViolationCode),
            violation_description: read(Field::ViolationDescription),
            critical_flag: read(Field::CriticalFlag),
            score: read(Field::Score),
        }
    }

    /// Raw value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Name => &self.name,
            Field::Address => &self.address,
            Field::Phone => &self.phone,
            Field::Cuisine => &self.cuisine,
            Field::InspectionDate => &self.inspection_date,
            Field::Action => &self.action,
            Field::ViolationCode => &self.violation_code,
            Field::ViolationDescription => &self.violation_description,
            Field::CriticalFlag => &self.critical_flag,
            Field::Score => &self.score,
        };
        value.as_deref()
    }

    /// Value of `field` for display, substituting the field's fallback text.
    #[must_use]
    pub fn display(&self, field: Field) -> Cow<'_, str> {
        self.get(field)
            .map_or(Cow::Borrowed(field.fallback()), Cow::Borrowed)
    }

    /// Classified critical flag.
    #[must_use]
    pub fn critical_flag(&self) -> CriticalFlag {
        CriticalFlag::parse(self.critical_flag.as_deref())
    }
}

fn property_text(properties: &Properties, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
