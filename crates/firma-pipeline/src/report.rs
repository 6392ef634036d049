//! The comparison result handed to callers and report renderers.

use serde::{Deserialize, Serialize};

use crate::compare::{Comparison, ParameterComparison};
use crate::descriptor::SignatureDescriptor;
use crate::normalize::CanonicalKey;
use crate::verdict::{DecisionRule, Verdict};

/// Velocity difference beyond which execution speed differs.
pub const VELOCITY_TOLERANCE: f64 = 0.2;
/// Largest proportion difference still called similar.
pub const PROPORTION_TOLERANCE: f64 = 0.2;
/// Largest pressure difference still called compatible.
pub const PRESSURE_TOLERANCE: f64 = 10.0;
/// Largest inclination difference (degrees) still called similar.
pub const INCLINATION_TOLERANCE: f64 = 5.0;
/// Largest curvature difference still called coherent.
pub const CURVATURE_TOLERANCE: f64 = 15.0;
/// Largest spacing difference (mm) still called homogeneous.
pub const SPACING_TOLERANCE: f64 = 5.0;

/// Everything a renderer needs to present a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Final similarity in `[0, 1]`.
    pub similarity: f64,
    /// Structural similarity of the analysis masks.
    pub structural_similarity: f64,
    /// Weighted feature compatibility.
    pub parameters_score: f64,
    /// Average naturalness in `[0, 1]`.
    pub naturalness: f64,
    /// Verdict label.
    pub verdict: Verdict,
    /// Confidence in percent.
    pub confidence: u8,
    /// Rationale of the verdict.
    pub explanation: String,
    /// Decision-table row that fired.
    pub rule: DecisionRule,
    /// One sentence per compared aspect.
    pub description: String,
    /// Per-parameter rows (chart data).
    pub compatibility: Vec<ParameterComparison>,
    /// Descriptor of the questioned signature.
    pub verifica_parameters: SignatureDescriptor,
    /// Descriptor of the reference signature.
    pub reference_parameters: SignatureDescriptor,
}

impl ComparisonReport {
    /// Assemble the report for a comparison of the two descriptors.
    #[must_use]
    pub fn new(comparison: Comparison, verifica: SignatureDescriptor, reference: SignatureDescriptor) -> Self {
        let description = describe(&verifica, &reference);
        let Comparison {
            structural_similarity,
            parameters_score,
            final_similarity,
            avg_naturalness,
            classification,
            parameters,
        } = comparison;
        Self {
            similarity: final_similarity,
            structural_similarity,
            parameters_score,
            naturalness: avg_naturalness / 100.0,
            verdict: classification.verdict,
            confidence: classification.confidence,
            explanation: classification.explanation,
            rule: classification.rule,
            description,
            compatibility: parameters,
            verifica_parameters: verifica,
            reference_parameters: reference,
        }
    }
}

/// Plain-language comparison of the headline parameters, one line each.
///
/// Aspects missing from either descriptor are reported as not
/// comparable.
#[must_use]
pub fn describe(verifica: &SignatureDescriptor, reference: &SignatureDescriptor) -> String {
    let pair = |key| verifica.number(key).zip(reference.number(key));
    let mut lines = Vec::with_capacity(6);

    lines.push(match pair(CanonicalKey::Velocity) {
        Some((v, r)) if v > r + VELOCITY_TOLERANCE => {
            "The questioned signature was executed faster than the reference."
        }
        Some((v, r)) if v < r - VELOCITY_TOLERANCE => {
            "The questioned signature was executed more slowly than the reference."
        }
        Some(_) => "Execution speed is compatible between the two signatures.",
        None => "Execution speed could not be compared.",
    });

    let aspects = [
        (
            CanonicalKey::Proportion,
            PROPORTION_TOLERANCE,
            "Height-to-width proportions are similar.",
            "Height-to-width proportions differ significantly.",
            "Proportions could not be compared.",
        ),
        (
            CanonicalKey::PressureMean,
            PRESSURE_TOLERANCE,
            "Writing pressure is compatible between the two signatures.",
            "Writing pressure differs noticeably between the signatures.",
            "Writing pressure could not be compared.",
        ),
        (
            CanonicalKey::Inclination,
            INCLINATION_TOLERANCE,
            "Stroke inclination is similar.",
            "Stroke inclination shows stylistic differences.",
            "Stroke inclination could not be compared.",
        ),
        (
            CanonicalKey::AvgCurvature,
            CURVATURE_TOLERANCE,
            "Roundness and angularity of the strokes are consistent.",
            "Roundness and angularity of the strokes differ markedly.",
            "Stroke curvature could not be compared.",
        ),
        (
            CanonicalKey::AvgSpacing,
            SPACING_TOLERANCE,
            "Spacing between letters is homogeneous.",
            "Spacing between letters is inconsistent.",
            "Letter spacing could not be compared.",
        ),
    ];
    for (key, tolerance, close, apart, missing) in aspects {
        lines.push(match pair(key) {
            Some((v, r)) if (v - r).abs() < tolerance => close,
            Some(_) => apart,
            None => missing,
        });
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
