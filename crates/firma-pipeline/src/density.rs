//! Mask-level structure: how tightly ink is packed, how many separate
//! pieces it forms and how often strokes meet.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::binarize::{INK, ink_pixel_count};
use crate::contour::{self, Retrieval};
use crate::measure::{Measure, NeutralReason};

/// Components at or below this pixel area are treated as specks.
pub const MIN_COMPONENT_AREA: u64 = 10;

/// Lower bound for the letter connection count.
pub const MIN_CONNECTIONS: u32 = 1;

/// Upper bound for the letter connection count.
pub const MAX_CONNECTIONS: u32 = 25;

/// Regions whose isoperimetric ratio `perimeter² / (4π·area)` exceeds
/// this are branched enough to hold a joint.
pub const COMPLEX_REGION_RATIO: f64 = 3.0;

/// Minimum area in pixels for an eroded region to be considered.
pub const MIN_REGION_AREA: f64 = 10.0;

/// Junction scan samples every n-th row and column.
pub const JUNCTION_SAMPLE_STEP: usize = 2;

/// Ink pixels over ink pixels after one 3×3 dilation, in `(0, 1]`.
///
/// Dense, overlapping strokes barely grow when dilated and approach 1;
/// thin isolated strokes roughly triple and sit near 1/3.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overlap_ratio(mask: &GrayImage) -> Measure<f64> {
    let ink = ink_pixel_count(mask);
    if ink == 0 {
        return Measure::neutral(0.0, NeutralReason::NoInk);
    }
    let grown = ink_pixel_count(&dilate(mask, Norm::LInf, 1));
    Measure::finite_or(ink as f64 / grown.max(ink) as f64, 0.0)
}

/// Number of 8-connected ink components larger than
/// [`MIN_COMPONENT_AREA`], at least 1.
#[must_use]
pub fn component_count(mask: &GrayImage) -> Measure<u32> {
    if ink_pixel_count(mask) == 0 {
        return Measure::neutral(1, NeutralReason::NoInk);
    }
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let max_label = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize;
    let mut areas = vec![0_u64; max_label + 1];
    for p in labels.pixels() {
        areas[p.0[0] as usize] += 1;
    }
    let count = areas
        .iter()
        .skip(1)
        .filter(|&&a| a > MIN_COMPONENT_AREA)
        .count();
    Measure::Measured(u32::try_from(count).unwrap_or(u32::MAX).max(1))
}

/// Estimated number of joins between letters, clamped to
/// `[MIN_CONNECTIONS, MAX_CONNECTIONS]`.
///
/// Sums two signals on the analysis mask: branched regions that survive
/// one erosion, and sampled junction pixels where three or more strokes
/// meet.
#[must_use]
pub fn letter_connections(analysis_mask: &GrayImage) -> Measure<u32> {
    if ink_pixel_count(analysis_mask) == 0 {
        return Measure::neutral(MIN_CONNECTIONS, NeutralReason::NoInk);
    }
    let eroded = erode(analysis_mask, Norm::L1, 1);
    let complex = contour::extract(&eroded, Retrieval::External)
        .iter()
        .filter(|c| {
            let area = c.area();
            let perimeter = c.perimeter();
            area >= MIN_REGION_AREA
                && perimeter * perimeter / (4.0 * std::f64::consts::PI * area) > COMPLEX_REGION_RATIO
        })
        .count();
    let junctions = junction_count(analysis_mask, JUNCTION_SAMPLE_STEP);
    let total = u32::try_from(complex + junctions).unwrap_or(u32::MAX);
    Measure::Measured(total.clamp(MIN_CONNECTIONS, MAX_CONNECTIONS))
}

/// Offsets of the 8-neighbourhood in ring order.
const RING: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Count sampled ink pixels whose 8-ring has at least three separate
/// ink runs.
fn junction_count(mask: &GrayImage, step: usize) -> usize {
    let (w, h) = (i64::from(mask.width()), i64::from(mask.height()));
    let ink_at = |x: i64, y: i64| -> bool {
        u32::try_from(x)
            .ok()
            .zip(u32::try_from(y).ok())
            .and_then(|(x, y)| mask.get_pixel_checked(x, y))
            .is_some_and(|p| p.0[0] == INK)
    };

    let mut count = 0;
    for y in (1..h - 1).step_by(step) {
        for x in (1..w - 1).step_by(step) {
            if !ink_at(x, y) {
                continue;
            }
            let ring: Vec<bool> = RING.iter().map(|&(dx, dy)| ink_at(x + dx, y + dy)).collect();
            let crossings = (0..ring.len())
                .filter(|&i| !ring[i] && ring[(i + 1) % ring.len()])
                .count();
            if crossings >= 3 {
                count += 1;
            }
        }
    }
    count
}
