//! Location-risk scoring against a [`FeatureDomainTable`].
#![forbid(unsafe_code)]

use geo::Coord;
use inspection_core::LocationScorer;

use crate::FeatureDomainTable;

/// Relative weight of each normalised field in the location score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationWeights {
    /// Weight applied to the normalised violation count.
    pub violations: f64,
    /// Weight applied to the normalised longitude.
    pub longitude: f64,
    /// Weight applied to the normalised latitude.
    pub latitude: f64,
}

impl Default for LocationWeights {
    fn default() -> Self {
        Self {
            violations: 0.5,
            longitude: 0.25,
            latitude: 0.25,
        }
    }
}

/// Scores a coordinate by min-max normalising the matching table record.
///
/// Coordinates without an exact match in the table score `0.0`. A table with
/// a single record has zero-width bounds for every field, so its only record
/// also scores `0.0`.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use inspection_core::LocationScorer;
/// use inspection_scorer::{DomainTableScorer, FeatureDomainTable, LocationRecord};
///
/// let table = FeatureDomainTable::new(vec![
///     LocationRecord { longitude: 0.0, latitude: 0.0, violations: 0 },
///     LocationRecord { longitude: 1.0, latitude: 1.0, violations: 4 },
/// ])?;
/// let scorer = DomainTableScorer::new(table);
/// assert_eq!(scorer.location_score(Coord { x: 1.0, y: 1.0 }), 1.0);
/// assert_eq!(scorer.location_score(Coord { x: 5.0, y: 5.0 }), 0.0);
/// # Ok::<(), inspection_scorer::DomainTableError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainTableScorer {
    table: FeatureDomainTable,
    weights: LocationWeights,
}

impl DomainTableScorer {
    /// Score against `table` with the default weights.
    #[must_use]
    pub fn new(table: FeatureDomainTable) -> Self {
        Self::with_weights(table, LocationWeights::default())
    }

    /// Score against `table` with custom `weights`.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "tables are loaded at runtime"
    )]
    #[must_use]
    pub fn with_weights(table: FeatureDomainTable, weights: LocationWeights) -> Self {
        Self { table, weights }
    }

    /// The table scores are computed against.
    #[must_use]
    pub const fn table(&self) -> &FeatureDomainTable {
        &self.table
    }
}

impl LocationScorer for DomainTableScorer {
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted sum of normalised fields"
    )]
    fn location_score(&self, position: Coord<f64>) -> f64 {
        let Some(record) = self.table.find(position) else {
            log::trace!("no domain record at ({}, {})", position.x, position.y);
            return 0.0;
        };
        let bounds = self.table.bounds();
        let raw = self.weights.violations * bounds.violations.normalise(f64::from(record.violations))
            + self.weights.longitude * bounds.longitude.normalise(record.longitude)
            + self.weights.latitude * bounds.latitude.normalise(record.latitude);
        Self::sanitise(raw)
    }
}
