//! Structural similarity between two analysis masks.
//!
//! The comparator only needs a number in `[0, 1]`; how it is computed
//! is pluggable through [`StructuralSimilarity`]. The default backend is
//! the mean structural similarity index from `image-compare`.

use image::GrayImage;
use image_compare::Algorithm;
use serde::{Deserialize, Serialize};

use crate::types::FirmaError;

/// Scores how alike two equally sized grayscale images are.
pub trait StructuralSimilarity {
    /// Similarity in `[0, 1]`, 1 meaning identical.
    ///
    /// # Errors
    ///
    /// Returns [`FirmaError::Similarity`] if the backend cannot compare
    /// the images (for example when their sizes differ).
    fn similarity(&self, a: &GrayImage, b: &GrayImage) -> Result<f64, FirmaError>;
}

/// Built-in similarity backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimilarityKind {
    /// Mean SSIM over 8×8 windows (`image_compare`'s `MSSIMSimple`).
    #[default]
    Mssim,
}

impl StructuralSimilarity for SimilarityKind {
    fn similarity(&self, a: &GrayImage, b: &GrayImage) -> Result<f64, FirmaError> {
        match self {
            Self::Mssim => {
                let result = image_compare::gray_similarity_structure(&Algorithm::MSSIMSimple, a, b)
                    .map_err(|e| FirmaError::Similarity(format!("{e:?}")))?;
                Ok(clamp_score(result.score))
            }
        }
    }
}

/// Clamp into `[0, 1]`; non-finite scores count as no similarity.
fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stripes(offset: u32) -> GrayImage {
        GrayImage::from_fn(64, 32, |x, _| {
            image::Luma([if (x + offset) % 8 < 4 { 255 } else { 0 }])
        })
    }

    #[test]
    fn identical_images_score_one() {
        let s = SimilarityKind::Mssim.similarity(&stripes(0), &stripes(0)).unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn inverted_stripes_score_low() {
        let s = SimilarityKind::Mssim.similarity(&stripes(0), &stripes(4)).unwrap();
        assert!((0.0..0.5).contains(&s), "got {s}");
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let err = SimilarityKind::Mssim.similarity(&GrayImage::new(10, 10), &GrayImage::new(12, 10));
        assert!(matches!(err, Err(FirmaError::Similarity(_))));
    }

    #[test]
    fn non_finite_scores_are_zero() {
        assert!(clamp_score(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_score(1.2) - 1.0).abs() < f64::EPSILON);
        assert!(clamp_score(-0.3).abs() < f64::EPSILON);
    }
}
