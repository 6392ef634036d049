//! A calibrated, segmented signature image.
//!
//! Everything feature extractors read is computed once here: the two
//! masks, their calibrations and the contour sets at both resolutions.

use image::GrayImage;

use crate::binarize::{analysis_mask, binarize};
use crate::calibration::Calibration;
use crate::contour::{self, Contour, Retrieval};
use crate::types::{AnalysisConfig, Dimensions, FirmaError, PhysicalSize};

/// Masks, calibrations and contours for one signature.
#[derive(Debug, Clone)]
pub struct Scan {
    /// Grayscale input at native resolution.
    pub gray: GrayImage,
    /// Ink mask at native resolution.
    pub native_mask: GrayImage,
    /// Ink mask on the fixed analysis canvas.
    pub analysis_mask: GrayImage,
    /// Calibration of the native image.
    pub native: Calibration,
    /// Calibration of the analysis canvas.
    pub analysis: Calibration,
    /// Top-level outer borders of the native mask.
    pub external: Vec<Contour>,
    /// Top-level outer borders of the analysis mask.
    pub analysis_external: Vec<Contour>,
    /// Every border of the analysis mask.
    pub analysis_hierarchy: Vec<Contour>,
}

impl Scan {
    /// Segment `gray`, which covers `physical` millimeters.
    ///
    /// # Errors
    ///
    /// - [`FirmaError::InvalidConfig`] if `config` fails validation.
    /// - [`FirmaError::EmptyInput`] for a zero-sized image.
    /// - [`FirmaError::InvalidCalibration`] for a bad physical size.
    /// - [`FirmaError::NoSignature`] if the native or the analysis mask
    ///   has no outer contour.
    pub fn new(gray: GrayImage, physical: PhysicalSize, config: &AnalysisConfig) -> Result<Self, FirmaError> {
        config.validate()?;
        if gray.width() == 0 || gray.height() == 0 {
            return Err(FirmaError::EmptyInput);
        }

        let native = Calibration::new(Dimensions::of(&gray), physical)?;
        let native_mask = binarize(&gray, config.ink_threshold);
        let external = contour::extract(&native_mask, Retrieval::External);
        if external.is_empty() {
            return Err(FirmaError::NoSignature);
        }

        let analysis_mask = analysis_mask(
            &gray,
            config.analysis_width,
            config.analysis_height,
            config.ink_threshold,
        );
        let analysis = native.resampled(Dimensions::of(&analysis_mask))?;
        let analysis_external = contour::extract(&analysis_mask, Retrieval::External);
        if analysis_external.is_empty() {
            return Err(FirmaError::NoSignature);
        }
        let analysis_hierarchy = contour::extract(&analysis_mask, Retrieval::Hierarchy);

        log::debug!(
            "scan {}x{} px, {:.2}x{:.2} px/mm, {} external contours ({} on analysis canvas)",
            gray.width(),
            gray.height(),
            native.px_per_mm_x(),
            native.px_per_mm_y(),
            external.len(),
            analysis_external.len(),
        );

        Ok(Self {
            gray,
            native_mask,
            analysis_mask,
            native,
            analysis,
            external,
            analysis_external,
            analysis_hierarchy,
        })
    }

    /// Pixel size of the native image.
    #[must_use]
    pub fn pixels(&self) -> Dimensions {
        Dimensions::of(&self.gray)
    }
}
