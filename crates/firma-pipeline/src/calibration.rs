//! Pixel-to-millimeter calibration.
//!
//! Every millimeter-denominated feature goes through a [`Calibration`]
//! built from the image's pixel dimensions and the physical size the
//! examiner measured on the document. Two calibrations exist per image:
//! the native one and the one for the fixed analysis canvas (same
//! physical area, different sampling).

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, FirmaError, PhysicalSize};

/// Pixels-per-millimeter scale factors.
///
/// Invariant: all three factors are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    px_per_mm_x: f64,
    px_per_mm_y: f64,
    physical: PhysicalSize,
}

impl Calibration {
    /// Build the calibration for an image of `pixels` size covering
    /// `physical` millimeters.
    ///
    /// # Errors
    ///
    /// Returns [`FirmaError::InvalidCalibration`] if either physical side
    /// is non-positive or non-finite, or if the image has a zero side.
    pub fn new(pixels: Dimensions, physical: PhysicalSize) -> Result<Self, FirmaError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(physical.width_mm)
            || !valid(physical.height_mm)
            || pixels.width == 0
            || pixels.height == 0
        {
            return Err(FirmaError::InvalidCalibration {
                width_mm: physical.width_mm,
                height_mm: physical.height_mm,
            });
        }

        Ok(Self {
            px_per_mm_x: f64::from(pixels.width) / physical.width_mm,
            px_per_mm_y: f64::from(pixels.height) / physical.height_mm,
            physical,
        })
    }

    /// Calibration of the same physical area resampled to `pixels`.
    ///
    /// # Errors
    ///
    /// Returns [`FirmaError::InvalidCalibration`] if `pixels` has a zero
    /// side.
    pub fn resampled(&self, pixels: Dimensions) -> Result<Self, FirmaError> {
        Self::new(pixels, self.physical)
    }

    /// Horizontal pixels per millimeter.
    #[must_use]
    pub const fn px_per_mm_x(&self) -> f64 {
        self.px_per_mm_x
    }

    /// Vertical pixels per millimeter.
    #[must_use]
    pub const fn px_per_mm_y(&self) -> f64 {
        self.px_per_mm_y
    }

    /// Mean of the horizontal and vertical factors.
    #[must_use]
    pub fn px_per_mm(&self) -> f64 {
        f64::midpoint(self.px_per_mm_x, self.px_per_mm_y)
    }

    /// The physical size this calibration was built from.
    #[must_use]
    pub const fn physical(&self) -> PhysicalSize {
        self.physical
    }

    /// Horizontal pixel distance to millimeters.
    #[must_use]
    pub fn x_to_mm(&self, px: f64) -> f64 {
        px / self.px_per_mm_x
    }

    /// Vertical pixel distance to millimeters.
    #[must_use]
    pub fn y_to_mm(&self, px: f64) -> f64 {
        px / self.px_per_mm_y
    }

    /// Pixel area to square millimeters.
    #[must_use]
    pub fn area_to_mm2(&self, px2: f64) -> f64 {
        px2 / (self.px_per_mm_x * self.px_per_mm_y)
    }
}
