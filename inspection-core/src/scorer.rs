//! Score how risky an establishment's location is.
//!
//! The `LocationScorer` trait maps a raw coordinate pair to a bounded
//! location-risk score used as one element of the
//! [`FeatureVector`](crate::FeatureVector).

use geo::Coord;

/// Calculate a location-risk score for a coordinate pair.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so a session can be
/// shared with background inference work. The method is infallible;
/// implementers must return `0.0` when the location is unknown.
///
/// Implementations must:
/// - Produce finite (`f64::is_finite`) scores.
/// - Normalise results to the range `0.0..=1.0`.
///
/// Use [`LocationScorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use inspection_core::LocationScorer;
///
/// struct FlatScorer;
///
/// impl LocationScorer for FlatScorer {
///     fn location_score(&self, _position: Coord<f64>) -> f64 {
///         0.5
///     }
/// }
///
/// assert_eq!(FlatScorer.location_score(Coord { x: 0.0, y: 0.0 }), 0.5);
/// ```
pub trait LocationScorer: Send + Sync {
    /// Return the location-risk score for `position`.
    fn location_score(&self, position: Coord<f64>) -> f64;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
