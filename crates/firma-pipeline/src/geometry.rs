//! Size, aspect and slant of the signature.
//!
//! All three read the external contours of the native-resolution mask,
//! so results are in true millimeters (dimensions) or independent of
//! scale (proportion, inclination).

use geo::{MinimumRotatedRect, MultiPoint};

use crate::calibration::Calibration;
use crate::contour::{self, Contour};
use crate::measure::{Measure, NeutralReason};
use crate::stats;
use crate::types::{DimensionsMm, Point};

/// Inclination reported when no contour supports an estimate.
pub const FALLBACK_INCLINATION: f64 = 15.0;

/// Samples steeper than this are treated as vertical strokes rather than
/// slant, unless nothing flatter was found.
pub const MAX_PLAUSIBLE_INCLINATION: f64 = 60.0;

/// Minimum enclosed area (px²) for a contour to vote on the slant.
pub const MIN_SLANT_AREA: f64 = 50.0;

/// Minimum number of border points for a contour to vote on the slant.
pub const MIN_SLANT_POINTS: usize = 5;

/// Width and height of the inked area in millimeters.
#[must_use]
pub fn dimensions(external: &[Contour], calibration: &Calibration) -> Measure<DimensionsMm> {
    contour::bounding_box(external).map_or(
        Measure::neutral(
            DimensionsMm {
                width: 0.0,
                height: 0.0,
            },
            NeutralReason::NoInk,
        ),
        |bbox| {
            Measure::Measured(DimensionsMm {
                width: calibration.x_to_mm(bbox.width()),
                height: calibration.y_to_mm(bbox.height()),
            })
        },
    )
}

/// Width over height of the inked area.
#[must_use]
pub fn proportion(dimensions: Measure<DimensionsMm>) -> Measure<f64> {
    match dimensions {
        Measure::Measured(d) if d.height > 0.0 => Measure::finite_or(d.width / d.height, 0.0),
        Measure::Measured(_) => Measure::neutral(0.0, NeutralReason::Degenerate),
        Measure::Neutral { reason, .. } => Measure::neutral(0.0, reason),
    }
}

/// Dominant stroke slant in degrees from horizontal, in `[0, 90]`.
///
/// Pools three estimators (regression line through every qualifying
/// point, per-contour ellipse orientation, per-contour minimum rotated
/// rectangle) and takes the median. Samples above
/// [`MAX_PLAUSIBLE_INCLINATION`] are dropped when flatter ones exist.
#[must_use]
pub fn inclination(external: &[Contour]) -> Measure<f64> {
    let mut voters: Vec<&Contour> = external
        .iter()
        .filter(|c| c.len() >= MIN_SLANT_POINTS && c.area() > MIN_SLANT_AREA)
        .collect();
    if voters.is_empty() {
        // Small signatures: let the biggest blob speak for itself.
        voters.extend(contour::largest(external).filter(|c| c.len() >= MIN_SLANT_POINTS));
    }

    let mut samples = Vec::new();
    samples.extend(regression_angle(
        voters.iter().flat_map(|c| c.points().iter().copied()),
    ));
    for c in &voters {
        samples.extend(ellipse_angle(c.points()));
        samples.extend(min_rect_angle(c.points()));
    }

    let plausible: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|&a| a <= MAX_PLAUSIBLE_INCLINATION)
        .collect();
    let pool = if plausible.is_empty() { &samples } else { &plausible };

    stats::median(pool).map_or(
        Measure::neutral(FALLBACK_INCLINATION, NeutralReason::NoQualifyingContour),
        Measure::Measured,
    )
}

/// Fold any line angle in degrees into `[0, 90]`.
fn fold_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(180.0);
    if a > 90.0 { 180.0 - a } else { a }
}

/// Slope of the least-squares line `y = m·x + q` through the points.
#[allow(clippy::cast_precision_loss)]
fn regression_angle(points: impl Iterator<Item = Point>) -> Option<f64> {
    let points: Vec<Point> = points.collect();
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y).sum::<f64>() / n;
    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), p| {
        let (dx, dy) = (p.x - mx, p.y - my);
        (dx.mul_add(dx, sxx), dx.mul_add(dy, sxy), dy.mul_add(dy, syy))
    });
    if sxx <= f64::EPSILON {
        // A vertical spread has no finite slope.
        return (syy > f64::EPSILON).then_some(90.0);
    }
    Some((sxy / sxx).abs().atan().to_degrees())
}

/// Orientation of the principal axis of the point cloud, from its
/// second-order central moments. `None` for isotropic clouds.
#[allow(clippy::cast_precision_loss)]
fn ellipse_angle(points: &[Point]) -> Option<f64> {
    if points.len() < MIN_SLANT_POINTS {
        return None;
    }
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y).sum::<f64>() / n;
    let (mu20, mu11, mu02) = points.iter().fold((0.0, 0.0, 0.0), |(a, b, c), p| {
        let (dx, dy) = (p.x - mx, p.y - my);
        (dx.mul_add(dx, a), dx.mul_add(dy, b), dy.mul_add(dy, c))
    });
    let spread = mu20 + mu02;
    let anisotropy = (mu20 - mu02).mul_add(mu20 - mu02, 4.0 * mu11 * mu11);
    if spread <= f64::EPSILON || anisotropy <= 1e-6 * spread * spread {
        return None;
    }
    let theta = 0.5 * (2.0 * mu11).atan2(mu20 - mu02);
    Some(fold_angle(theta.to_degrees()))
}

/// Angle of the long side of the minimum-area rotated rectangle.
fn min_rect_angle(points: &[Point]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let cloud: MultiPoint<f64> = points.iter().map(|p| geo::Point::new(p.x, p.y)).collect();
    let rect = cloud.minimum_rotated_rect()?;
    let long_side = rect.exterior().lines().max_by(|a, b| {
        let la = a.dx().hypot(a.dy());
        let lb = b.dx().hypot(b.dy());
        la.total_cmp(&lb)
    })?;
    if long_side.dx().hypot(long_side.dy()) <= f64::EPSILON {
        return None;
    }
    Some(fold_angle(long_side.dy().atan2(long_side.dx()).to_degrees()))
}
