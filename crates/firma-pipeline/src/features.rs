//! The full feature set of one signature.

use serde::{Deserialize, Serialize};

use crate::classify::{self, Readability, WritingStyle};
use crate::complexity::stroke_complexity;
use crate::curvature::{average_curvature, turning_angles};
use crate::density::{component_count, letter_connections, overlap_ratio};
use crate::descriptor::{FeatureValue, SignatureDescriptor};
use crate::geometry::{dimensions, inclination, proportion};
use crate::layout::{average_spacing, baseline_deviation, velocity};
use crate::loops::average_loop_area;
use crate::measure::{Measure, NeutralReason};
use crate::naturalness::Naturalness;
use crate::normalize::CanonicalKey;
use crate::pressure::{pressure_stats, pressure_values};
use crate::scan::Scan;
use crate::types::{AnalysisConfig, DimensionsMm};

/// Every feature, each tagged measured or neutral.
///
/// Field names serialize to the canonical descriptor keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureFeatures {
    pub dimensions: Measure<DimensionsMm>,
    pub proportion: Measure<f64>,
    pub inclination: Measure<f64>,
    pub pressure_mean: Measure<f64>,
    pub pressure_std: Measure<f64>,
    pub avg_curvature: Measure<f64>,
    pub avg_asola_size: Measure<f64>,
    pub avg_spacing: Measure<f64>,
    pub velocity: Measure<f64>,
    pub overlap_ratio: Measure<f64>,
    pub letter_connections: Measure<u32>,
    pub baseline_std_mm: Measure<f64>,
    pub stroke_complexity: Measure<f64>,
    pub connected_components: Measure<u32>,
    pub fluidity_score: Measure<f64>,
    pub pressure_consistency: Measure<f64>,
    pub coordination_index: Measure<f64>,
    pub naturalness_index: Measure<f64>,
    pub readability: Measure<Readability>,
    pub writing_style: Measure<WritingStyle>,
}

impl SignatureFeatures {
    /// Run every extractor on a scan.
    #[must_use]
    pub fn extract(scan: &Scan, config: &AnalysisConfig) -> Self {
        let dimensions = dimensions(&scan.external, &scan.native);
        let proportion = proportion(dimensions);

        let pressures = pressure_values(&scan.gray, &scan.native_mask);
        let (pressure_mean, pressure_std) = pressure_stats(&pressures, config.normalize_pressure);

        let angles = turning_angles(&scan.analysis_external, config.curvature_stride);
        let naturalness = Naturalness::assess(&scan.external, &pressures, &angles);

        Self {
            dimensions,
            proportion,
            inclination: inclination(&scan.external),
            pressure_mean,
            pressure_std,
            avg_curvature: average_curvature(&angles, &scan.analysis, config.curvature_per_mm),
            avg_asola_size: average_loop_area(&scan.analysis_hierarchy, &scan.analysis),
            avg_spacing: average_spacing(&scan.external, &scan.native),
            velocity: velocity(&scan.external),
            overlap_ratio: overlap_ratio(&scan.native_mask),
            letter_connections: letter_connections(&scan.analysis_mask),
            baseline_std_mm: baseline_deviation(&scan.external, &scan.native),
            stroke_complexity: stroke_complexity(&scan.external),
            connected_components: component_count(&scan.native_mask),
            fluidity_score: naturalness.fluidity,
            pressure_consistency: naturalness.pressure_consistency,
            coordination_index: naturalness.coordination,
            naturalness_index: naturalness.index,
            readability: classify::readability(pressure_mean, config.normalize_pressure),
            writing_style: classify::writing_style(proportion),
        }
    }

    /// Features that fell back to their neutral value, with the reason.
    #[must_use]
    pub fn neutral_features(&self) -> Vec<(CanonicalKey, NeutralReason)> {
        let reasons = [
            (CanonicalKey::Dimensions, self.dimensions.reason()),
            (CanonicalKey::Proportion, self.proportion.reason()),
            (CanonicalKey::Inclination, self.inclination.reason()),
            (CanonicalKey::PressureMean, self.pressure_mean.reason()),
            (CanonicalKey::PressureStd, self.pressure_std.reason()),
            (CanonicalKey::AvgCurvature, self.avg_curvature.reason()),
            (CanonicalKey::AvgAsolaSize, self.avg_asola_size.reason()),
            (CanonicalKey::AvgSpacing, self.avg_spacing.reason()),
            (CanonicalKey::Velocity, self.velocity.reason()),
            (CanonicalKey::OverlapRatio, self.overlap_ratio.reason()),
            (CanonicalKey::LetterConnections, self.letter_connections.reason()),
            (CanonicalKey::BaselineStdMm, self.baseline_std_mm.reason()),
            (CanonicalKey::StrokeComplexity, self.stroke_complexity.reason()),
            (CanonicalKey::ConnectedComponents, self.connected_components.reason()),
            (CanonicalKey::FluidityScore, self.fluidity_score.reason()),
            (CanonicalKey::PressureConsistency, self.pressure_consistency.reason()),
            (CanonicalKey::CoordinationIndex, self.coordination_index.reason()),
            (CanonicalKey::NaturalnessIndex, self.naturalness_index.reason()),
            (CanonicalKey::Readability, self.readability.reason()),
            (CanonicalKey::WritingStyle, self.writing_style.reason()),
        ];
        reasons
            .into_iter()
            .filter_map(|(key, reason)| reason.map(|r| (key, r)))
            .collect()
    }

    /// The descriptor view: one canonical entry per feature, values
    /// only.
    #[must_use]
    pub fn to_descriptor(&self) -> SignatureDescriptor {
        let entries: [(CanonicalKey, FeatureValue); 20] = [
            (CanonicalKey::Proportion, self.proportion.value().into()),
            (CanonicalKey::Inclination, self.inclination.value().into()),
            (CanonicalKey::PressureMean, self.pressure_mean.value().into()),
            (CanonicalKey::PressureStd, self.pressure_std.value().into()),
            (CanonicalKey::AvgCurvature, self.avg_curvature.value().into()),
            (CanonicalKey::AvgAsolaSize, self.avg_asola_size.value().into()),
            (CanonicalKey::AvgSpacing, self.avg_spacing.value().into()),
            (CanonicalKey::Velocity, self.velocity.value().into()),
            (CanonicalKey::OverlapRatio, self.overlap_ratio.value().into()),
            (CanonicalKey::LetterConnections, self.letter_connections.value().into()),
            (CanonicalKey::BaselineStdMm, self.baseline_std_mm.value().into()),
            (CanonicalKey::StrokeComplexity, self.stroke_complexity.value().into()),
            (CanonicalKey::ConnectedComponents, self.connected_components.value().into()),
            (CanonicalKey::FluidityScore, self.fluidity_score.value().into()),
            (CanonicalKey::PressureConsistency, self.pressure_consistency.value().into()),
            (CanonicalKey::CoordinationIndex, self.coordination_index.value().into()),
            (CanonicalKey::NaturalnessIndex, self.naturalness_index.value().into()),
            (CanonicalKey::Dimensions, self.dimensions.value().into()),
            (CanonicalKey::Readability, self.readability.value().as_str().into()),
            (CanonicalKey::WritingStyle, self.writing_style.value().as_str().into()),
        ];
        SignatureDescriptor::from_entries(entries.into_iter().map(|(k, v)| (k.as_str(), v)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PhysicalSize;
    use image::{GrayImage, Luma};

    fn scan_of(gray: GrayImage) -> Scan {
        Scan::new(gray, PhysicalSize::new(100.0, 50.0), &AnalysisConfig::default()).unwrap()
    }

    fn single_blob() -> GrayImage {
        GrayImage::from_fn(200, 100, |x, y| {
            Luma([if (80..120).contains(&x) && (30..70).contains(&y) { 20 } else { 255 }])
        })
    }

    #[test]
    fn single_region_reports_neutral_spacing() {
        let scan = scan_of(single_blob());
        let features = SignatureFeatures::extract(&scan, &AnalysisConfig::default());
        let neutral = features.neutral_features();
        assert!(neutral.contains(&(CanonicalKey::AvgSpacing, NeutralReason::TooFewContours)));
        assert!(!neutral.iter().any(|(key, _)| *key == CanonicalKey::PressureMean));
    }

    #[test]
    fn descriptor_has_one_entry_per_key() {
        let scan = scan_of(single_blob());
        let descriptor = SignatureFeatures::extract(&scan, &AnalysisConfig::default()).to_descriptor();
        assert_eq!(descriptor.len(), CanonicalKey::ALL.len());
        assert!(descriptor.text(CanonicalKey::Readability).is_some());
        assert!(descriptor.number(CanonicalKey::ConnectedComponents).is_some());
    }

    #[test]
    fn dark_ink_reads_as_heavy_pressure() {
        let scan = scan_of(single_blob());
        let features = SignatureFeatures::extract(&scan, &AnalysisConfig::default());
        // (255 - 20) / 255 * 100
        assert!((features.pressure_mean.value() - 92.156_862_745).abs() < 1e-6);
        assert_eq!(features.readability.value(), Readability::High);
    }
}
