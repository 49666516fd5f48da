//! Reference data used to normalise location features.
#![forbid(unsafe_code)]

use std::io::BufReader;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::DomainTableError;

/// Violation count recorded at one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Number of violations recorded at this location.
    pub violations: u32,
}

impl LocationRecord {
    /// Whether the record sits exactly at `position`.
    #[expect(
        clippy::float_cmp,
        reason = "domain lookups match published coordinates exactly"
    )]
    #[must_use]
    pub fn is_at(&self, position: Coord<f64>) -> bool {
        self.longitude == position.x && self.latitude == position.y
    }
}

/// The single record shipped as the built-in table.
const NEW_YORK: LocationRecord = LocationRecord {
    longitude: -74.006,
    latitude: 40.7128,
    violations: 10,
};

/// Closed interval spanned by one field across the whole table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl Span {
    const fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |span: Option<Self>, value| {
            Some(span.map_or(Self::point(value), |current| Self {
                min: current.min.min(value),
                max: current.max.max(value),
            }))
        })
    }

    /// Min-max normalise `value` into this span.
    ///
    /// A zero-width span normalises every value to `0.0`.
    #[expect(
        clippy::float_arithmetic,
        reason = "min-max normalisation divides by the span width"
    )]
    #[must_use]
    pub fn normalise(self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 || !width.is_finite() {
            return 0.0;
        }
        (value - self.min) / width
    }
}

/// Per-field spans across every record in a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    /// Span of violation counts.
    pub violations: Span,
    /// Span of longitudes.
    pub longitude: Span,
    /// Span of latitudes.
    pub latitude: Span,
}

/// Read-only table of per-location violation counts.
///
/// Bounds are computed once at construction and cover the entire table, not
/// just the record being scored.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use inspection_scorer::{FeatureDomainTable, LocationRecord};
///
/// let table = FeatureDomainTable::new(vec![
///     LocationRecord { longitude: -74.0, latitude: 40.7, violations: 2 },
///     LocationRecord { longitude: -73.9, latitude: 40.8, violations: 12 },
/// ])?;
/// assert_eq!(table.bounds().violations.max, 12.0);
/// assert!(table.find(Coord { x: -73.9, y: 40.8 }).is_some());
/// # Ok::<(), inspection_scorer::DomainTableError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDomainTable {
    records: Vec<LocationRecord>,
    bounds: DomainBounds,
}

impl FeatureDomainTable {
    /// Validate `records` and derive their bounds.
    ///
    /// # Errors
    /// Returns [`DomainTableError::Empty`] for an empty table and
    /// [`DomainTableError::NonFiniteCoordinate`] when a record holds NaN or
    /// infinite coordinates.
    pub fn new(records: Vec<LocationRecord>) -> Result<Self, DomainTableError> {
        if let Some(index) = records
            .iter()
            .position(|record| !record.longitude.is_finite() || !record.latitude.is_finite())
        {
            return Err(DomainTableError::NonFiniteCoordinate { index });
        }
        let violations = Span::of(records.iter().map(|record| f64::from(record.violations)));
        let longitude = Span::of(records.iter().map(|record| record.longitude));
        let latitude = Span::of(records.iter().map(|record| record.latitude));
        match (violations, longitude, latitude) {
            (Some(violations), Some(longitude), Some(latitude)) => Ok(Self {
                records,
                bounds: DomainBounds {
                    violations,
                    longitude,
                    latitude,
                },
            }),
            _ => Err(DomainTableError::Empty),
        }
    }

    /// Load a table from a JSON array of records.
    ///
    /// # Errors
    /// Returns [`DomainTableError`] when the file cannot be opened or parsed,
    /// or when its records fail validation.
    pub fn load(path: &Utf8Path) -> Result<Self, DomainTableError> {
        let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            DomainTableError::OpenFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let records: Vec<LocationRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| DomainTableError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("loaded {} domain records from {path}", records.len());
        Self::new(records)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Bounds across the whole table.
    #[must_use]
    pub const fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    /// First record located exactly at `position`.
    #[must_use]
    pub fn find(&self, position: Coord<f64>) -> Option<&LocationRecord> {
        self.records.iter().find(|record| record.is_at(position))
    }
}

impl Default for FeatureDomainTable {
    fn default() -> Self {
        Self {
            records: vec![NEW_YORK],
            bounds: DomainBounds {
                violations: Span::point(f64::from(NEW_YORK.violations)),
                longitude: Span::point(NEW_YORK.longitude),
                latitude: Span::point(NEW_YORK.latitude),
            },
        }
    }
}
