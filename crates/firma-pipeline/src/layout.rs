//! Placement of strokes on the page: spacing between ink regions,
//! baseline steadiness and how much stroke is packed into the extent.

use crate::calibration::Calibration;
use crate::contour::{self, Contour};
use crate::measure::{Measure, NeutralReason};
use crate::stats;

/// Mean horizontal gap in millimeters between consecutive ink regions,
/// measured between their leftmost columns.
#[must_use]
pub fn average_spacing(external: &[Contour], calibration: &Calibration) -> Measure<f64> {
    let mut lefts: Vec<f64> = external
        .iter()
        .filter_map(Contour::bounding_box)
        .map(|b| b.min_x)
        .collect();
    if lefts.len() < 2 {
        return Measure::neutral(0.0, NeutralReason::TooFewContours);
    }
    lefts.sort_by(f64::total_cmp);
    let gaps: Vec<f64> = lefts.windows(2).map(|w| w[1] - w[0]).collect();
    stats::mean(&gaps).map_or(
        Measure::neutral(0.0, NeutralReason::TooFewContours),
        |gap| Measure::Measured(calibration.x_to_mm(gap)),
    )
}

/// Population standard deviation of the vertical position of every
/// border point, in millimeters.
#[must_use]
pub fn baseline_deviation(external: &[Contour], calibration: &Calibration) -> Measure<f64> {
    let ys: Vec<f64> = external
        .iter()
        .flat_map(|c| c.points().iter().map(|p| p.y))
        .collect();
    if ys.len() < 2 {
        return Measure::neutral(0.0, NeutralReason::TooFewContours);
    }
    stats::std_dev(&ys).map_or(
        Measure::neutral(0.0, NeutralReason::TooFewContours),
        |std| Measure::Measured(calibration.y_to_mm(std)),
    )
}

/// Stroke length relative to the signature's extent: total open arc
/// length of the borders divided by the bounding-box diagonal.
///
/// Fast, fluent signatures cover their extent with long continuous
/// strokes; slow ones are shorter and more fragmented.
#[must_use]
pub fn velocity(external: &[Contour]) -> Measure<f64> {
    let Some(bbox) = contour::bounding_box(external) else {
        return Measure::neutral(0.0, NeutralReason::NoInk);
    };
    let diagonal = (bbox.max_x - bbox.min_x).hypot(bbox.max_y - bbox.min_y);
    if diagonal <= 0.0 {
        return Measure::neutral(0.0, NeutralReason::Degenerate);
    }
    let length: f64 = external.iter().map(Contour::arc_length).sum();
    Measure::finite_or(length / diagonal, 0.0)
}
