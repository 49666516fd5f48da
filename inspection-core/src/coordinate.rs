//! Anchor clicked points next to the viewer across the antimeridian.
//!
//! Map engines render the world repeatedly when the view is panned past
//! ±180°. A point's stored longitude therefore may sit a whole turn away from
//! the copy the user actually clicked. [`unwrap_longitude`] shifts the stored
//! longitude by whole turns until it lies within half a turn of the pointer.

use geo::Coord;

/// Degrees in a full turn of longitude.
pub const FULL_TURN: f64 = 360.0;

/// Largest allowed distance between the unwrapped longitude and the pointer.
pub const HALF_TURN: f64 = 180.0;

// Whole turns are removed up front; at most one correction remains, the
// extra iterations absorb rounding at the seam.
const MAX_CORRECTIONS: usize = 4;

/// Shift `longitude` by whole turns so it lies within [`HALF_TURN`] of
/// `pointer_longitude`.
///
/// The result is congruent to `longitude` modulo 360°. A turn is added while
/// the pointer lies east of the candidate and subtracted otherwise. Non-finite
/// input is returned unchanged.
///
/// # Examples
///
/// ```
/// use inspection_core::coordinate::unwrap_longitude;
///
/// let unwrapped = unwrap_longitude(-74.01, 179.9);
/// assert!((unwrapped - 285.99).abs() < 1e-9);
/// assert_eq!(unwrap_longitude(10.0, 20.0), 10.0);
/// ```
#[must_use]
pub fn unwrap_longitude(longitude: f64, pointer_longitude: f64) -> f64 {
    if !longitude.is_finite() || !pointer_longitude.is_finite() {
        return longitude;
    }

    let whole_turns = ((pointer_longitude - longitude) / FULL_TURN).trunc();
    let mut unwrapped = longitude + whole_turns * FULL_TURN;
    for _ in 0..MAX_CORRECTIONS {
        if (pointer_longitude - unwrapped).abs() <= HALF_TURN {
            break;
        }
        unwrapped += if pointer_longitude > unwrapped {
            FULL_TURN
        } else {
            -FULL_TURN
        };
    }
    unwrapped
}

/// Unwrap the longitude of `position` against `pointer_longitude`, leaving
/// the latitude untouched.
///
/// Coordinates follow `geo` conventions: `x = longitude`, `y = latitude`.
#[must_use]
pub fn anchor_near_pointer(position: Coord<f64>, pointer_longitude: f64) -> Coord<f64> {
    Coord {
        x: unwrap_longitude(position.x, pointer_longitude),
        y: position.y,
    }
}
