//! firma-pipeline: signature feature extraction and comparison (sans-IO).
//!
//! Turns a scanned signature into a calibrated set of graphological
//! features and compares two such sets:
//! decode -> grayscale -> calibrate -> binarize (native + analysis canvas)
//! -> contours -> features -> descriptor; two descriptors + structural
//! similarity -> parameter score -> verdict.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory
//! byte slices and returns structured data; reading files, parsing
//! arguments and printing JSON live in `firma-cli`.

pub mod binarize;
pub mod calibration;
pub mod classify;
pub mod compare;
pub mod complexity;
pub mod contour;
pub mod curvature;
pub mod density;
pub mod descriptor;
pub mod features;
pub mod geometry;
pub mod grayscale;
pub mod layout;
pub mod loops;
pub mod measure;
pub mod naturalness;
pub mod normalize;
pub mod pressure;
pub mod report;
pub mod scan;
pub mod similarity;
pub mod simplify;
pub mod stats;
pub mod types;
pub mod verdict;

pub use calibration::Calibration;
pub use classify::{Readability, WritingStyle};
pub use compare::{Comparison, ParameterComparison, compare_descriptors};
pub use descriptor::{FeatureValue, SignatureDescriptor};
pub use features::SignatureFeatures;
pub use measure::{Measure, NeutralReason};
pub use normalize::{CanonicalKey, canonical_name};
pub use report::ComparisonReport;
pub use scan::Scan;
pub use similarity::{SimilarityKind, StructuralSimilarity};
pub use types::{
    AnalysisConfig, AnalysisMetadata, Dimensions, DimensionsMm, ErrorReport, FirmaError, GrayImage,
    PhysicalSize, SignatureAnalysis,
};
pub use verdict::{Classification, DecisionRule, Verdict};

/// One signature to compare: encoded image bytes and the physical size
/// of the scanned area.
#[derive(Debug, Clone, Copy)]
pub struct SignatureInput<'a> {
    /// Encoded image (PNG, JPEG, BMP, WebP, TIFF).
    pub image_bytes: &'a [u8],
    /// Real-world size of the scan.
    pub physical: PhysicalSize,
}

/// Analyze one signature image.
///
/// # Errors
///
/// Returns [`FirmaError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`FirmaError::ImageDecode`] if the image format is unrecognized.
/// Returns [`FirmaError::InvalidCalibration`] for a non-positive physical size.
/// Returns [`FirmaError::NoSignature`] if no ink is found.
/// Returns [`FirmaError::InvalidConfig`] if `config` fails validation.
pub fn analyze(
    image_bytes: &[u8],
    physical: PhysicalSize,
    config: &AnalysisConfig,
) -> Result<SignatureAnalysis, FirmaError> {
    let gray = grayscale::decode_and_grayscale(image_bytes)?;
    analyze_gray(gray, physical, config)
}

/// Analyze an already decoded grayscale image.
///
/// # Errors
///
/// Same as [`analyze`], minus the decoding errors.
pub fn analyze_gray(
    gray: GrayImage,
    physical: PhysicalSize,
    config: &AnalysisConfig,
) -> Result<SignatureAnalysis, FirmaError> {
    let scan = Scan::new(gray, physical, config)?;
    let features = SignatureFeatures::extract(&scan, config);
    for (key, reason) in features.neutral_features() {
        log::debug!("{} not measurable ({reason}), using neutral value", key.as_str());
    }

    let metadata = AnalysisMetadata {
        pixels: scan.pixels(),
        physical,
        px_per_mm_x: scan.native.px_per_mm_x(),
        px_per_mm_y: scan.native.px_per_mm_y(),
    };
    Ok(SignatureAnalysis {
        descriptor: features.to_descriptor(),
        features,
        analysis_mask: scan.analysis_mask,
        metadata,
    })
}

/// Compare two analyzed signatures.
///
/// # Errors
///
/// Returns [`FirmaError::Similarity`] if the similarity backend fails.
/// Returns [`FirmaError::NoComparableFeatures`] if the descriptors share
/// no weighted feature.
pub fn compare_analyses(
    verifica: &SignatureAnalysis,
    reference: &SignatureAnalysis,
    similarity: &impl StructuralSimilarity,
) -> Result<ComparisonReport, FirmaError> {
    let ssim = similarity.similarity(&verifica.analysis_mask, &reference.analysis_mask)?;
    let comparison = compare_descriptors(&verifica.descriptor, &reference.descriptor, ssim)?;
    Ok(ComparisonReport::new(
        comparison,
        verifica.descriptor.clone(),
        reference.descriptor.clone(),
    ))
}

/// Analyze and compare a questioned signature against a reference.
///
/// Both images go through the same configuration, so their analysis
/// masks share one canvas size.
///
/// # Errors
///
/// Any error of [`analyze`] for either image, or of
/// [`compare_analyses`].
pub fn compare(
    verifica: SignatureInput<'_>,
    reference: SignatureInput<'_>,
    config: &AnalysisConfig,
    similarity: &impl StructuralSimilarity,
) -> Result<ComparisonReport, FirmaError> {
    let verifica = analyze(verifica.image_bytes, verifica.physical, config)?;
    let reference = analyze(reference.image_bytes, reference.physical, config)?;
    compare_analyses(&verifica, &reference, similarity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A PNG of a dark horizontal bar with a loop above it.
    fn signature_png() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(400, 200, |x, y| {
            let (dx, dy) = (f64::from(x) - 200.0, f64::from(y) - 80.0);
            let ring = (dx.hypot(dy) - 20.0).abs() < 3.0;
            let bar = (60..340).contains(&x) && (120..126).contains(&y);
            if ring || bar {
                image::Rgba([20, 20, 20, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn analyze_empty_input() {
        let result = analyze(&[], PhysicalSize::new(100.0, 50.0), &AnalysisConfig::default());
        assert!(matches!(result, Err(FirmaError::EmptyInput)));
    }

    #[test]
    fn analyze_blank_page() {
        let blank = GrayImage::from_pixel(200, 100, image::Luma([255]));
        let result = analyze_gray(blank, PhysicalSize::new(100.0, 50.0), &AnalysisConfig::default());
        assert!(matches!(result, Err(FirmaError::NoSignature)));
    }

    #[test]
    fn analyze_reports_metadata_and_full_descriptor() {
        let analysis = analyze(&signature_png(), PhysicalSize::new(100.0, 50.0), &AnalysisConfig::default()).unwrap();
        assert_eq!(
            analysis.metadata.pixels,
            Dimensions {
                width: 400,
                height: 200
            }
        );
        assert!((analysis.metadata.px_per_mm_x - 4.0).abs() < 1e-12);
        assert_eq!(analysis.descriptor.len(), CanonicalKey::ALL.len());
        for key in CanonicalKey::ALL {
            assert!(analysis.descriptor.value(key).is_some(), "missing {}", key.as_str());
        }
        assert_eq!(analysis.analysis_mask.dimensions(), (300, 150));
    }

    #[test]
    fn compare_signature_with_itself() {
        let png = signature_png();
        let input = SignatureInput {
            image_bytes: &png,
            physical: PhysicalSize::new(100.0, 50.0),
        };
        let report = compare(input, input, &AnalysisConfig::default(), &SimilarityKind::Mssim).unwrap();
        assert!(report.similarity >= 0.95, "similarity {}", report.similarity);
        assert_eq!(report.verdict, Verdict::Authentic);
    }
}
