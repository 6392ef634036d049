//! Descriptor comparison: per-feature compatibility, weighted parameter
//! score and the final similarity that feeds the verdict.

use serde::{Deserialize, Serialize};

use crate::classify::{Readability, WritingStyle};
use crate::descriptor::{FeatureValue, SignatureDescriptor};
use crate::normalize::CanonicalKey;
use crate::types::FirmaError;
use crate::verdict::{self, Classification};

/// Share of the final similarity taken by structural similarity.
pub const STRUCTURAL_WEIGHT: f64 = 0.6;

/// Share of the final similarity taken by the parameter score.
pub const PARAMETERS_WEIGHT: f64 = 0.4;

/// Naturalness assumed when neither descriptor carries one.
pub const DEFAULT_NATURALNESS: f64 = 50.0;

/// How two values of a feature are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    /// Numeric, judged by relative difference.
    Relative,
    /// Numeric, judged by absolute difference (small-magnitude features).
    Absolute,
    /// Label, equal or not.
    Categorical,
    /// Label on the Low < Medium < High scale.
    Ordinal,
}

/// A weighted feature of the parameter score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureWeight {
    /// Which feature.
    pub key: CanonicalKey,
    /// Weight as a fraction; all weights sum to 1.
    pub weight: f64,
    /// How values are compared.
    pub scale: Scale,
}

const fn weighted(key: CanonicalKey, weight: f64, scale: Scale) -> FeatureWeight {
    FeatureWeight { key, weight, scale }
}

/// The features entering the parameter score, heaviest first.
pub const FEATURE_WEIGHTS: [FeatureWeight; 15] = [
    weighted(CanonicalKey::PressureMean, 0.16, Scale::Relative),
    weighted(CanonicalKey::AvgCurvature, 0.14, Scale::Relative),
    weighted(CanonicalKey::Proportion, 0.12, Scale::Relative),
    weighted(CanonicalKey::Velocity, 0.10, Scale::Relative),
    weighted(CanonicalKey::PressureStd, 0.08, Scale::Relative),
    weighted(CanonicalKey::AvgAsolaSize, 0.08, Scale::Absolute),
    weighted(CanonicalKey::AvgSpacing, 0.06, Scale::Relative),
    weighted(CanonicalKey::Inclination, 0.05, Scale::Relative),
    weighted(CanonicalKey::OverlapRatio, 0.05, Scale::Relative),
    weighted(CanonicalKey::LetterConnections, 0.05, Scale::Relative),
    weighted(CanonicalKey::BaselineStdMm, 0.04, Scale::Absolute),
    weighted(CanonicalKey::StrokeComplexity, 0.04, Scale::Relative),
    weighted(CanonicalKey::ConnectedComponents, 0.02, Scale::Relative),
    weighted(CanonicalKey::WritingStyle, 0.01, Scale::Categorical),
    weighted(CanonicalKey::Readability, 0.0, Scale::Ordinal),
];

/// Compatibility of two magnitudes by relative difference.
#[must_use]
pub fn relative_compatibility(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale <= f64::EPSILON {
        return 1.0;
    }
    let r = (a - b).abs() / scale;
    if r <= 0.05 {
        0.98
    } else if r <= 0.10 {
        0.90
    } else if r <= 0.15 {
        0.80
    } else if r <= 0.25 {
        0.60
    } else if r <= 0.50 {
        0.30
    } else {
        (1.0 - r).max(0.10)
    }
}

/// Compatibility of two small magnitudes by absolute difference.
#[must_use]
pub fn absolute_compatibility(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d <= 0.05 {
        0.95
    } else if d <= 0.1 {
        0.80
    } else if d <= 0.2 {
        0.60
    } else {
        (0.60 * (1.0 - (d - 0.2) / 0.8)).max(0.0)
    }
}

/// Compatibility of two writing-style labels.
#[must_use]
pub fn style_compatibility(a: &str, b: &str) -> f64 {
    let same = match (a.parse::<WritingStyle>(), b.parse::<WritingStyle>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    };
    if same { 1.0 } else { 0.5 }
}

/// Compatibility of two readability labels, graded by how many steps
/// apart they are.
#[must_use]
pub fn readability_compatibility(a: &str, b: &str) -> f64 {
    match (a.parse::<Readability>(), b.parse::<Readability>()) {
        (Ok(x), Ok(y)) => match x.rank().abs_diff(y.rank()) {
            0 => 1.0,
            1 => 0.6,
            _ => 0.2,
        },
        _ => style_compatibility(a, b),
    }
}

/// One row of the per-parameter comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterComparison {
    /// Canonical feature name.
    pub name: String,
    /// Value in the questioned signature.
    pub verifica: FeatureValue,
    /// Value in the reference signature.
    pub reference: FeatureValue,
    /// Absolute difference for numeric features.
    pub difference: Option<f64>,
    /// Compatibility in `[0, 1]`.
    pub compatibility: f64,
    /// Weight in the parameter score.
    pub weight: f64,
}

/// Result of comparing two descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Structural similarity of the analysis masks, in `[0, 1]`.
    pub structural_similarity: f64,
    /// Weighted feature compatibility, in `[0, 1]`.
    pub parameters_score: f64,
    /// Blend of structural similarity and parameter score.
    pub final_similarity: f64,
    /// Mean naturalness index of the two signatures (0–100).
    pub avg_naturalness: f64,
    /// Verdict and the rule behind it.
    pub classification: Classification,
    /// Per-feature rows, in weight order.
    pub parameters: Vec<ParameterComparison>,
}

fn compare_feature(entry: FeatureWeight, a: &FeatureValue, b: &FeatureValue) -> Option<ParameterComparison> {
    let (difference, compatibility) = match entry.scale {
        Scale::Relative | Scale::Absolute => {
            let (x, y) = (a.as_f64()?, b.as_f64()?);
            let c = if entry.scale == Scale::Relative {
                relative_compatibility(x, y)
            } else {
                absolute_compatibility(x, y)
            };
            (Some((x - y).abs()), c)
        }
        Scale::Categorical => (None, style_compatibility(a.as_text()?, b.as_text()?)),
        Scale::Ordinal => (None, readability_compatibility(a.as_text()?, b.as_text()?)),
    };
    Some(ParameterComparison {
        name: entry.key.as_str().to_string(),
        verifica: a.clone(),
        reference: b.clone(),
        difference,
        compatibility,
        weight: entry.weight,
    })
}

/// Compare two descriptors and classify the result.
///
/// Only features present (with a usable value) in both descriptors are
/// scored; the weights of the remaining ones are renormalized.
/// `structural_similarity` is clamped into `[0, 1]`.
///
/// # Errors
///
/// Returns [`FirmaError::NoComparableFeatures`] if no weighted feature
/// is present in both descriptors.
pub fn compare_descriptors(
    verifica: &SignatureDescriptor,
    reference: &SignatureDescriptor,
    structural_similarity: f64,
) -> Result<Comparison, FirmaError> {
    let parameters: Vec<ParameterComparison> = FEATURE_WEIGHTS
        .iter()
        .filter_map(|&entry| {
            let row = compare_feature(entry, verifica.value(entry.key)?, reference.value(entry.key)?);
            if row.is_none() {
                log::debug!("skipping {}: values are not comparable", entry.key.as_str());
            }
            row
        })
        .collect();

    let total_weight: f64 = parameters.iter().map(|p| p.weight).sum();
    if total_weight <= 0.0 {
        return Err(FirmaError::NoComparableFeatures);
    }
    let parameters_score = parameters
        .iter()
        .map(|p| p.compatibility * p.weight)
        .sum::<f64>()
        / total_weight;

    let structural_similarity = if structural_similarity.is_finite() {
        structural_similarity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let final_similarity = STRUCTURAL_WEIGHT.mul_add(structural_similarity, PARAMETERS_WEIGHT * parameters_score);

    let naturalness: Vec<f64> = [verifica, reference]
        .iter()
        .filter_map(|d| d.number(CanonicalKey::NaturalnessIndex))
        .collect();
    let avg_naturalness = crate::stats::mean(&naturalness).unwrap_or(DEFAULT_NATURALNESS);

    let classification = verdict::classify(final_similarity, avg_naturalness);
    log::debug!(
        "compared {} parameters: ssim {structural_similarity:.3}, parameters {parameters_score:.3}, \
         final {final_similarity:.3}, naturalness {avg_naturalness:.1} -> {} (rule {})",
        parameters.len(),
        classification.verdict,
        classification.rule.number(),
    );

    Ok(Comparison {
        structural_similarity,
        parameters_score,
        final_similarity,
        avg_naturalness,
        classification,
        parameters,
    })
}
