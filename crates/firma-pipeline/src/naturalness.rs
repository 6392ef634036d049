//! Naturalness: does the signature look written or drawn?
//!
//! Three sub-scores on a 0–100 scale feed a weighted index:
//!
//! - **fluidity** penalises jerky changes of direction along borders,
//! - **pressure consistency** rewards a moderate, lively spread of ink
//!   darkness (forgers tend to press either uniformly or erratically),
//! - **coordination** does the same for the spread of turning angles.
//!
//! A sub-score that cannot be measured contributes [`NEUTRAL_SCORE`].

use crate::contour::Contour;
use crate::measure::{Measure, NeutralReason};
use crate::stats;
use crate::types::Point;

/// Score reported for an unmeasurable component.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Border points are sampled every this many pixels for fluidity.
pub const FLUIDITY_SAMPLE_STEP: usize = 3;

/// Minimum number of sampled points per contour for fluidity.
pub const MIN_FLUIDITY_SAMPLES: usize = 10;

/// Pressure coefficient of variation typical of natural writing.
pub const PRESSURE_CV_BAND: (f64, f64) = (0.10, 0.30);

/// Turning-angle coefficient of variation typical of natural writing.
pub const COORDINATION_CV_BAND: (f64, f64) = (0.3, 0.8);

/// Weights of fluidity, pressure consistency and coordination.
pub const NATURALNESS_WEIGHTS: (f64, f64, f64) = (0.4, 0.3, 0.3);

/// The three sub-scores and their combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Naturalness {
    /// Smoothness of direction changes.
    pub fluidity: Measure<f64>,
    /// Liveliness of pressure variation.
    pub pressure_consistency: Measure<f64>,
    /// Liveliness of turning-angle variation.
    pub coordination: Measure<f64>,
    /// Weighted combination.
    pub index: Measure<f64>,
}

impl Naturalness {
    /// Score all three components and combine them.
    #[must_use]
    pub fn assess(external: &[Contour], pressures: &[f64], angles: &[f64]) -> Self {
        let fluidity = fluidity(external);
        let pressure_consistency = pressure_consistency(pressures);
        let coordination = coordination(angles);
        Self {
            fluidity,
            pressure_consistency,
            coordination,
            index: naturalness_index(fluidity, pressure_consistency, coordination),
        }
    }
}

/// Score in `[0, 100]` that peaks for values inside `[low, high]`.
///
/// Inside the band the score falls from 100 at the centre to 85 at the
/// edges. Below it falls linearly to 0 at `v = 0`; above it falls
/// linearly to 0 at `v = 2·high`.
#[must_use]
pub fn peaked_score(value: f64, (low, high): (f64, f64)) -> f64 {
    if value < low {
        85.0 * (value / low).max(0.0)
    } else if value <= high {
        let centre = f64::midpoint(low, high);
        let half_width = (high - low) / 2.0;
        15.0f64.mul_add(-(value - centre).abs() / half_width, 100.0)
    } else {
        85.0 * (1.0 - (value - high) / high).max(0.0)
    }
}

/// Smoothness of border trajectories: `100 / (1 + irregularity)` where
/// irregularity is the spread of acceleration relative to the contour's
/// arc length, averaged over contours weighted by arc length.
#[must_use]
pub fn fluidity(external: &[Contour]) -> Measure<f64> {
    let weighted: Vec<(f64, f64)> = external
        .iter()
        .filter_map(|c| {
            let samples: Vec<Point> = c.points().iter().step_by(FLUIDITY_SAMPLE_STEP).copied().collect();
            if samples.len() < MIN_FLUIDITY_SAMPLES {
                return None;
            }
            let length = c.arc_length();
            irregularity(&samples, length).map(|irr| (irr, length))
        })
        .collect();

    stats::weighted_mean(&weighted).map_or(
        Measure::neutral(NEUTRAL_SCORE, NeutralReason::NoQualifyingContour),
        |irr| Measure::finite_or(100.0 / (1.0 + irr), NEUTRAL_SCORE),
    )
}

/// `std(|second difference|) / arc_length`.
fn irregularity(samples: &[Point], arc_length: f64) -> Option<f64> {
    if arc_length <= f64::EPSILON {
        return None;
    }
    let steps: Vec<(f64, f64)> = samples.windows(2).map(|w| (w[1].x - w[0].x, w[1].y - w[0].y)).collect();
    let accelerations: Vec<f64> = steps
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .collect();
    stats::std_dev(&accelerations).map(|s| s / arc_length)
}

/// Peaked score of the pressure coefficient of variation over
/// [`PRESSURE_CV_BAND`].
#[must_use]
pub fn pressure_consistency(pressures: &[f64]) -> Measure<f64> {
    stats::coefficient_of_variation(pressures).map_or(
        Measure::neutral(
            NEUTRAL_SCORE,
            if pressures.is_empty() {
                NeutralReason::NoInk
            } else {
                NeutralReason::Degenerate
            },
        ),
        |cv| Measure::finite_or(peaked_score(cv, PRESSURE_CV_BAND), NEUTRAL_SCORE),
    )
}

/// Peaked score of the turning-angle coefficient of variation over
/// [`COORDINATION_CV_BAND`].
#[must_use]
pub fn coordination(angles: &[f64]) -> Measure<f64> {
    stats::coefficient_of_variation(angles).map_or(
        Measure::neutral(NEUTRAL_SCORE, NeutralReason::NoQualifyingContour),
        |cv| Measure::finite_or(peaked_score(cv, COORDINATION_CV_BAND), NEUTRAL_SCORE),
    )
}

/// Weighted combination of the sub-scores. Neutral only when all three
/// are neutral.
#[must_use]
pub fn naturalness_index(
    fluidity: Measure<f64>,
    pressure_consistency: Measure<f64>,
    coordination: Measure<f64>,
) -> Measure<f64> {
    let (wf, wp, wc) = NATURALNESS_WEIGHTS;
    let value = wc.mul_add(
        coordination.value(),
        wf.mul_add(fluidity.value(), wp * pressure_consistency.value()),
    );
    match (fluidity.reason(), pressure_consistency.reason(), coordination.reason()) {
        (Some(reason), Some(_), Some(_)) => Measure::neutral(value, reason),
        _ => Measure::finite_or(value, NEUTRAL_SCORE),
    }
}
