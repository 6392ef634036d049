//! Turning angles along stroke borders.
//!
//! Borders are chain-compressed first, so straight runs contribute a
//! single corner and the mean reflects how angular the writing is:
//! sharp zig-zags give small interior angles, round letters large ones.

use crate::calibration::Calibration;
use crate::contour::Contour;
use crate::measure::{Measure, NeutralReason};
use crate::stats;
use crate::types::Point;

/// Interior angles (degrees) at every compressed border point.
///
/// For each point the angle is taken between the vectors to the
/// neighbours `stride` positions before and after it. The stride is
/// reduced for short chains so every contour with at least three points
/// contributes.
#[must_use]
pub fn turning_angles(contours: &[Contour], stride: usize) -> Vec<f64> {
    let mut angles = Vec::new();
    for contour in contours {
        let chain = contour.compressed();
        let pts = chain.points();
        if pts.len() < 3 {
            continue;
        }
        let s = stride.min((pts.len() - 1) / 2).max(1);
        angles.extend((s..pts.len() - s).filter_map(|i| interior_angle(pts[i - s], pts[i], pts[i + s])));
    }
    angles
}

/// Angle at `vertex` between the rays towards `a` and `b`, or `None`
/// if either ray has zero length.
fn interior_angle(a: Point, vertex: Point, b: Point) -> Option<f64> {
    let (ux, uy) = (a.x - vertex.x, a.y - vertex.y);
    let (vx, vy) = (b.x - vertex.x, b.y - vertex.y);
    let norms = ux.hypot(uy) * vx.hypot(vy);
    if norms <= f64::EPSILON {
        return None;
    }
    let cos = (ux.mul_add(vx, uy * vy) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Mean turning angle in degrees, or in degrees per millimeter of the
/// analysis canvas when `per_mm` is set.
#[must_use]
pub fn average_curvature(angles: &[f64], analysis: &Calibration, per_mm: bool) -> Measure<f64> {
    stats::mean(angles).map_or(
        Measure::neutral(0.0, NeutralReason::NoQualifyingContour),
        |mean| {
            if per_mm {
                Measure::finite_or(mean * analysis.px_per_mm(), 0.0)
            } else {
                Measure::Measured(mean)
            }
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contour::BorderKind;
    use crate::types::{Dimensions, PhysicalSize};

    fn contour(points: &[(f64, f64)]) -> Contour {
        Contour::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            BorderKind::Outer,
        )
    }

    #[test]
    fn right_angle_corner() {
        let a = interior_angle(Point::new(1.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((a.unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_ray_is_skipped() {
        assert!(interior_angle(Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn square_interior_angles_are_right_angles() {
        let square = contour(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let angles = turning_angles(&[square], 1);
        assert_eq!(angles.len(), 2);
        assert!(angles.iter().all(|a| (a - 90.0).abs() < 1e-9));
    }

    #[test]
    fn short_chains_contribute_nothing() {
        let stub = contour(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(turning_angles(&[stub], 1).is_empty());
    }

    #[test]
    fn empty_samples_are_neutral() {
        let calibration = Calibration::new(
            Dimensions {
                width: 300,
                height: 150,
            },
            PhysicalSize::new(100.0, 50.0),
        )
        .unwrap();
        let m = average_curvature(&[], &calibration, false);
        assert_eq!(m.reason(), Some(NeutralReason::NoQualifyingContour));

        let scaled = average_curvature(&[90.0], &calibration, true);
        assert!((scaled.value() - 270.0).abs() < 1e-9);
    }
}
