//! Stroke complexity: how much border detail survives polygon
//! approximation.

use crate::contour::Contour;
use crate::measure::{Measure, NeutralReason};
use crate::simplify::approximate_closed;
use crate::stats;

/// Contours at or below this area (px²) are ignored.
pub const MIN_COMPLEXITY_AREA: f64 = 20.0;

/// Approximation tolerance as a fraction of the contour perimeter.
pub const APPROXIMATION_EPSILON: f64 = 0.02;

/// Divisor mapping the raw point ratio onto `[0, 1]`.
pub const COMPLEXITY_SCALE: f64 = 10.0;

/// Perimeter-weighted ratio of compressed border points to approximated
/// polygon vertices, divided by [`COMPLEXITY_SCALE`] and capped at 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stroke_complexity(external: &[Contour]) -> Measure<f64> {
    let weighted: Vec<(f64, f64)> = external
        .iter()
        .filter(|c| c.area() > MIN_COMPLEXITY_AREA)
        .map(|c| {
            let perimeter = c.perimeter();
            let chain = c.compressed();
            let polygon = approximate_closed(chain.points(), APPROXIMATION_EPSILON * perimeter);
            (chain.len() as f64 / polygon.len().max(1) as f64, perimeter)
        })
        .collect();

    stats::weighted_mean(&weighted).map_or(
        Measure::neutral(0.0, NeutralReason::NoQualifyingContour),
        |ratio| Measure::finite_or((ratio / COMPLEXITY_SCALE).clamp(0.0, 1.0), 0.0),
    )
}
