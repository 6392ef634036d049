//! Closed loops ("asole") such as the eyes of `a`, `o` and `e`.
//!
//! Loops are read from the full border hierarchy of the analysis mask:
//! any small, round border qualifies, whether it outlines a hole or a
//! dot of ink.

use crate::calibration::Calibration;
use crate::contour::Contour;
use crate::measure::{Measure, NeutralReason};
use crate::stats;

/// Smallest loop area in analysis pixels (exclusive).
pub const MIN_LOOP_AREA: f64 = 20.0;

/// Largest loop area in analysis pixels (exclusive).
pub const MAX_LOOP_AREA: f64 = 500.0;

/// Minimum circularity for a border to count as a loop.
pub const MIN_LOOP_CIRCULARITY: f64 = 0.5;

/// Returns `true` if the border is small and round enough to be a loop.
#[must_use]
pub fn is_loop(contour: &Contour) -> bool {
    let area = contour.area();
    area > MIN_LOOP_AREA && area < MAX_LOOP_AREA && contour.circularity() > MIN_LOOP_CIRCULARITY
}

/// Mean loop area in square millimeters.
#[must_use]
pub fn average_loop_area(hierarchy: &[Contour], analysis: &Calibration) -> Measure<f64> {
    let areas: Vec<f64> = hierarchy
        .iter()
        .filter(|c| is_loop(c))
        .map(|c| analysis.area_to_mm2(c.area()))
        .collect();
    stats::mean(&areas).map_or(
        Measure::neutral(0.0, NeutralReason::NoQualifyingContour),
        Measure::Measured,
    )
}
