//! Shared types for the signature analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::descriptor::SignatureDescriptor;
use crate::features::SignatureFeatures;

/// Re-export `GrayImage` so downstream crates can hold masks and
/// grayscale scans without depending on `image` directly.
pub use image::GrayImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// A sequence of connected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Sum of segment lengths. When `closed`, the segment from the last
    /// point back to the first is included.
    #[must_use]
    pub fn arc_length(&self, closed: bool) -> f64 {
        let open: f64 = self.0.windows(2).map(|w| w[0].distance(w[1])).sum();
        match (closed, self.0.first(), self.0.last()) {
            (true, Some(&first), Some(&last)) if self.0.len() > 2 => open + last.distance(first),
            _ => open,
        }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an image buffer.
    #[must_use]
    pub fn of(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Real-world size of the scanned area, in millimeters.
///
/// Both values are mandatory for every analysis: there is no DPI
/// fallback. Validation happens when a
/// [`Calibration`](crate::calibration::Calibration) is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    /// Width of the scan in millimeters.
    pub width_mm: f64,
    /// Height of the scan in millimeters.
    pub height_mm: f64,
}

impl PhysicalSize {
    /// Create a new physical size.
    #[must_use]
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Scale both sides by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width_mm * factor, self.height_mm * factor)
    }
}

/// Width/height pair of the inked area in millimeters.
///
/// Serialized as a `{width, height}` object rounded to one decimal
/// place, which is what report renderers consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionsMm {
    /// Width in millimeters.
    #[serde(serialize_with = "round_one_decimal")]
    pub width: f64,
    /// Height in millimeters.
    #[serde(serialize_with = "round_one_decimal")]
    pub height: f64,
}

fn round_one_decimal<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10.0).round() / 10.0)
}

/// Image size and scale of an analyzed signature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Native pixel size.
    pub pixels: Dimensions,
    /// Physical size the examiner supplied.
    pub physical: PhysicalSize,
    /// Horizontal scale of the native image.
    pub px_per_mm_x: f64,
    /// Vertical scale of the native image.
    pub px_per_mm_y: f64,
}

/// Result of analyzing one signature.
///
/// The analysis mask is kept so a later comparison can compute
/// structural similarity without re-decoding the image.
#[derive(Debug, Clone)]
pub struct SignatureAnalysis {
    /// Every feature with its measured/neutral tag.
    pub features: SignatureFeatures,
    /// Canonical descriptor derived from `features`.
    pub descriptor: SignatureDescriptor,
    /// Ink mask on the fixed analysis canvas.
    pub analysis_mask: GrayImage,
    /// Size and calibration.
    pub metadata: AnalysisMetadata,
}

/// Configuration for feature extraction.
///
/// All parameters have defaults matching the calibrated analysis
/// described in the crate documentation. Use [`validate`](Self::validate)
/// before running the pipeline on user-supplied values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Global binarization cut. Pixels with intensity at or below this
    /// value are ink.
    pub ink_threshold: u8,

    /// Width of the fixed analysis canvas in pixels.
    pub analysis_width: u32,

    /// Height of the fixed analysis canvas in pixels.
    pub analysis_height: u32,

    /// Neighbour offset (in chain points) used for turning angles.
    pub curvature_stride: usize,

    /// Express average curvature per millimeter instead of in degrees.
    pub curvature_per_mm: bool,

    /// Report pressure statistics on a 0–100 scale instead of 0–255.
    pub normalize_pressure: bool,
}

impl AnalysisConfig {
    /// Default binarization threshold.
    pub const DEFAULT_INK_THRESHOLD: u8 = 150;
    /// Default analysis canvas width.
    pub const DEFAULT_ANALYSIS_WIDTH: u32 = 300;
    /// Default analysis canvas height.
    pub const DEFAULT_ANALYSIS_HEIGHT: u32 = 150;
    /// Default turning-angle stride.
    pub const DEFAULT_CURVATURE_STRIDE: usize = 1;

    /// Check the invariants the extractors rely on.
    ///
    /// # Errors
    ///
    /// Returns [`FirmaError::InvalidConfig`] if the analysis canvas has a
    /// zero side or the curvature stride is zero.
    pub fn validate(&self) -> Result<(), FirmaError> {
        if self.analysis_width == 0 || self.analysis_height == 0 {
            return Err(FirmaError::InvalidConfig(format!(
                "analysis canvas must be non-empty, got {}x{}",
                self.analysis_width, self.analysis_height,
            )));
        }
        if self.curvature_stride == 0 {
            return Err(FirmaError::InvalidConfig(
                "curvature_stride must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ink_threshold: Self::DEFAULT_INK_THRESHOLD,
            analysis_width: Self::DEFAULT_ANALYSIS_WIDTH,
            analysis_height: Self::DEFAULT_ANALYSIS_HEIGHT,
            curvature_stride: Self::DEFAULT_CURVATURE_STRIDE,
            curvature_per_mm: false,
            normalize_pressure: true,
        }
    }
}

/// Errors that abort an analysis or a comparison.
///
/// Feature-level problems never show up here: they degrade to a
/// [`Measure::Neutral`](crate::measure::Measure::Neutral) value instead.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum FirmaError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Physical dimensions are missing, non-positive, or non-finite.
    #[error("invalid calibration: physical size must be positive (got {width_mm} x {height_mm} mm)")]
    InvalidCalibration {
        /// Supplied width in millimeters.
        width_mm: f64,
        /// Supplied height in millimeters.
        height_mm: f64,
    },

    /// Binarization found no ink.
    #[error("no signature detected in the image")]
    NoSignature,

    /// Analysis configuration is invalid.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),

    /// The structural similarity collaborator failed.
    #[error("structural similarity failed: {0}")]
    Similarity(String),

    /// The two descriptors share no weighted feature.
    #[error("descriptors have no comparable features")]
    NoComparableFeatures,
}

/// Serde-compatible proxy for `FirmaError`.
#[derive(Serialize, Deserialize)]
enum FirmaErrorProxy {
    ImageDecode(String),
    EmptyInput,
    InvalidCalibration { width_mm: f64, height_mm: f64 },
    NoSignature,
    InvalidConfig(String),
    Similarity(String),
    NoComparableFeatures,
}

impl Serialize for FirmaError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => FirmaErrorProxy::ImageDecode(e.to_string()),
            Self::EmptyInput => FirmaErrorProxy::EmptyInput,
            Self::InvalidCalibration {
                width_mm,
                height_mm,
            } => FirmaErrorProxy::InvalidCalibration {
                width_mm: *width_mm,
                height_mm: *height_mm,
            },
            Self::NoSignature => FirmaErrorProxy::NoSignature,
            Self::InvalidConfig(s) => FirmaErrorProxy::InvalidConfig(s.clone()),
            Self::Similarity(s) => FirmaErrorProxy::Similarity(s.clone()),
            Self::NoComparableFeatures => FirmaErrorProxy::NoComparableFeatures,
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FirmaError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = FirmaErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            // The typed image error cannot be rebuilt; keep its message.
            FirmaErrorProxy::ImageDecode(msg) => {
                Self::InvalidConfig(format!("image decode error: {msg}"))
            }
            FirmaErrorProxy::EmptyInput => Self::EmptyInput,
            FirmaErrorProxy::InvalidCalibration {
                width_mm,
                height_mm,
            } => Self::InvalidCalibration {
                width_mm,
                height_mm,
            },
            FirmaErrorProxy::NoSignature => Self::NoSignature,
            FirmaErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
            FirmaErrorProxy::Similarity(s) => Self::Similarity(s),
            FirmaErrorProxy::NoComparableFeatures => Self::NoComparableFeatures,
        })
    }
}

/// The object handed to callers when an analysis or comparison fails.
///
/// Contains only the error message; no partial result accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Human-readable failure description.
    pub error: String,
}

impl<E: std::error::Error> From<&E> for ErrorReport {
    fn from(err: &E) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn arc_length_open_and_closed() {
        let square = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        assert!((square.arc_length(false) - 6.0).abs() < 1e-12);
        assert!((square.arc_length(true) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn arc_length_of_degenerate_polylines_is_zero() {
        assert!(Polyline::new(vec![]).arc_length(true).abs() < f64::EPSILON);
        let single = Polyline::new(vec![Point::new(4.0, 4.0)]);
        assert!(single.arc_length(true).abs() < f64::EPSILON);
    }

    #[test]
    fn config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.ink_threshold, 150);
        assert_eq!(config.analysis_width, 300);
        assert_eq!(config.analysis_height, 150);
        assert_eq!(config.curvature_stride, 1);
        assert!(!config.curvature_per_mm);
        assert!(config.normalize_pressure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_empty_canvas() {
        let config = AnalysisConfig {
            analysis_width: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FirmaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_rejects_zero_stride() {
        let config = AnalysisConfig {
            curvature_stride: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_partial_json_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"ink_threshold": 120}"#).unwrap();
        assert_eq!(config.ink_threshold, 120);
        assert_eq!(config.analysis_width, 300);
    }

    #[test]
    fn dimensions_mm_serialize_rounded() {
        let dims = DimensionsMm {
            width: 84.26,
            height: 31.04,
        };
        let json = serde_json::to_value(dims).unwrap();
        assert_eq!(json, serde_json::json!({"width": 84.3, "height": 31.0}));
    }

    #[test]
    fn error_display_messages() {
        assert_eq!(
            FirmaError::NoSignature.to_string(),
            "no signature detected in the image"
        );
        let err = FirmaError::InvalidCalibration {
            width_mm: 0.0,
            height_mm: 20.0,
        };
        assert!(err.to_string().starts_with("invalid calibration"));
    }

    #[test]
    fn error_serde_round_trip() {
        let err = FirmaError::InvalidCalibration {
            width_mm: -1.0,
            height_mm: 2.0,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: FirmaError = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            FirmaError::InvalidCalibration { width_mm, .. } if (width_mm + 1.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn error_report_carries_only_message() {
        let report = ErrorReport::from(&FirmaError::NoSignature);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "no signature detected in the image"})
        );
    }
}
