//! Ink darkness as a proxy for pen pressure.

use image::GrayImage;

use crate::binarize::INK;
use crate::measure::{Measure, NeutralReason};
use crate::stats;

/// Full-scale raw pressure value (`255 - 0`).
pub const RAW_PRESSURE_SCALE: f64 = 255.0;

/// Per-pixel pressure `255 - intensity` for every ink pixel of `mask`.
///
/// `gray` and `mask` must have the same dimensions; pixels outside the
/// overlap are ignored.
#[must_use]
pub fn pressure_values(gray: &GrayImage, mask: &GrayImage) -> Vec<f64> {
    gray.enumerate_pixels()
        .filter(|&(x, y, _)| mask.get_pixel_checked(x, y).is_some_and(|m| m.0[0] == INK))
        .map(|(_, _, p)| f64::from(255 - p.0[0]))
        .collect()
}

/// Mean and population standard deviation of the pressure values.
///
/// With `normalize` both are rescaled from `0..=255` to `0..=100`.
/// Without ink both are neutral zero.
#[must_use]
pub fn pressure_stats(values: &[f64], normalize: bool) -> (Measure<f64>, Measure<f64>) {
    let scale = if normalize {
        100.0 / RAW_PRESSURE_SCALE
    } else {
        1.0
    };
    match (stats::mean(values), stats::std_dev(values)) {
        (Some(mean), Some(std)) => (
            Measure::Measured(mean * scale),
            Measure::Measured(std * scale),
        ),
        _ => (
            Measure::neutral(0.0, NeutralReason::NoInk),
            Measure::neutral(0.0, NeutralReason::NoInk),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ink_pixels_contribute() {
        let gray = GrayImage::from_fn(3, 1, |x, _| image::Luma([[0, 100, 255][x as usize]]));
        let mask = GrayImage::from_fn(3, 1, |x, _| image::Luma([[INK, INK, 0][x as usize]]));
        assert_eq!(pressure_values(&gray, &mask), vec![255.0, 155.0]);
    }

    #[test]
    fn normalized_stats_are_on_percent_scale() {
        let (mean, std) = pressure_stats(&[255.0, 255.0], true);
        assert!((mean.value() - 100.0).abs() < 1e-9);
        assert!(std.value().abs() < 1e-9);

        let (mean, _) = pressure_stats(&[100.0, 200.0], false);
        assert!((mean.value() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn no_ink_is_neutral() {
        let (mean, std) = pressure_stats(&[], true);
        assert_eq!(mean.reason(), Some(NeutralReason::NoInk));
        assert_eq!(std.reason(), Some(NeutralReason::NoInk));
    }
}
