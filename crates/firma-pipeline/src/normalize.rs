//! Feature-name normalization.
//!
//! Descriptors have been written over time with several spellings for
//! the same feature (`PressureMean`, `pressure_mean`, `pressureMean`,
//! `Curvature` for `avgCurvature`, …). A single static table,
//! [`ALIASES`], maps every known spelling onto a [`CanonicalKey`]; all
//! descriptor reads go through it so no caller ever tries multiple
//! spellings by hand.

use serde::{Deserialize, Serialize};

/// The canonical feature keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalKey {
    /// Width over height of the inked area.
    Proportion,
    /// Dominant slant in degrees.
    Inclination,
    /// Mean pressure.
    PressureMean,
    /// Pressure standard deviation.
    PressureStd,
    /// Mean turning angle.
    AvgCurvature,
    /// Mean loop area in mm².
    AvgAsolaSize,
    /// Mean gap between ink regions in mm.
    AvgSpacing,
    /// Stroke length over extent.
    Velocity,
    /// Ink over dilated ink.
    OverlapRatio,
    /// Estimated joins between letters.
    LetterConnections,
    /// Vertical spread of the strokes in mm.
    BaselineStdMm,
    /// Border detail surviving approximation.
    StrokeComplexity,
    /// Separate ink pieces.
    ConnectedComponents,
    /// Naturalness: smoothness.
    FluidityScore,
    /// Naturalness: pressure liveliness.
    PressureConsistency,
    /// Naturalness: turning-angle liveliness.
    CoordinationIndex,
    /// Naturalness: weighted index.
    NaturalnessIndex,
    /// Width and height in mm.
    Dimensions,
    /// Low / Medium / High.
    Readability,
    /// Cursive / Print / Mixed.
    WritingStyle,
}

impl CanonicalKey {
    /// Every key, in descriptor order.
    pub const ALL: [Self; 20] = [
        Self::Proportion,
        Self::Inclination,
        Self::PressureMean,
        Self::PressureStd,
        Self::AvgCurvature,
        Self::AvgAsolaSize,
        Self::AvgSpacing,
        Self::Velocity,
        Self::OverlapRatio,
        Self::LetterConnections,
        Self::BaselineStdMm,
        Self::StrokeComplexity,
        Self::ConnectedComponents,
        Self::FluidityScore,
        Self::PressureConsistency,
        Self::CoordinationIndex,
        Self::NaturalnessIndex,
        Self::Dimensions,
        Self::Readability,
        Self::WritingStyle,
    ];

    /// Canonical spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proportion => "proportion",
            Self::Inclination => "inclination",
            Self::PressureMean => "pressureMean",
            Self::PressureStd => "pressureStd",
            Self::AvgCurvature => "avgCurvature",
            Self::AvgAsolaSize => "avgAsolaSize",
            Self::AvgSpacing => "avgSpacing",
            Self::Velocity => "velocity",
            Self::OverlapRatio => "overlapRatio",
            Self::LetterConnections => "letterConnections",
            Self::BaselineStdMm => "baselineStdMm",
            Self::StrokeComplexity => "strokeComplexity",
            Self::ConnectedComponents => "connectedComponents",
            Self::FluidityScore => "fluidityScore",
            Self::PressureConsistency => "pressureConsistency",
            Self::CoordinationIndex => "coordinationIndex",
            Self::NaturalnessIndex => "naturalnessIndex",
            Self::Dimensions => "dimensions",
            Self::Readability => "readability",
            Self::WritingStyle => "writingStyle",
        }
    }

    /// The primary legacy spelling that older report renderers read.
    #[must_use]
    pub const fn legacy_name(self) -> &'static str {
        match self {
            Self::Proportion => "Proportion",
            Self::Inclination => "Inclination",
            Self::PressureMean => "PressureMean",
            Self::PressureStd => "PressureStd",
            Self::AvgCurvature => "Curvature",
            Self::AvgAsolaSize => "AvgAsolaSize",
            Self::AvgSpacing => "AvgSpacing",
            Self::Velocity => "Velocity",
            Self::OverlapRatio => "OverlapRatio",
            Self::LetterConnections => "LetterConnections",
            Self::BaselineStdMm => "BaselineStd",
            Self::StrokeComplexity => "StrokeComplexity",
            Self::ConnectedComponents => "ConnectedComponents",
            Self::FluidityScore => "FluidityScore",
            Self::PressureConsistency => "PressureConsistency",
            Self::CoordinationIndex => "CoordinationIndex",
            Self::NaturalnessIndex => "NaturalnessIndex",
            Self::Dimensions => "Dimensions",
            Self::Readability => "Readability",
            Self::WritingStyle => "Style",
        }
    }

    /// Look up any known spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|&(_, key)| key)
    }
}

/// Every accepted spelling and the key it stands for.
pub const ALIASES: &[(&str, CanonicalKey)] = &[
    ("proportion", CanonicalKey::Proportion),
    ("Proportion", CanonicalKey::Proportion),
    ("inclination", CanonicalKey::Inclination),
    ("Inclination", CanonicalKey::Inclination),
    ("pressureMean", CanonicalKey::PressureMean),
    ("PressureMean", CanonicalKey::PressureMean),
    ("pressure_mean", CanonicalKey::PressureMean),
    ("pressureStd", CanonicalKey::PressureStd),
    ("PressureStd", CanonicalKey::PressureStd),
    ("pressure_std", CanonicalKey::PressureStd),
    ("avgCurvature", CanonicalKey::AvgCurvature),
    ("AvgCurvature", CanonicalKey::AvgCurvature),
    ("avg_curvature", CanonicalKey::AvgCurvature),
    ("Curvature", CanonicalKey::AvgCurvature),
    ("curvature", CanonicalKey::AvgCurvature),
    ("avgAsolaSize", CanonicalKey::AvgAsolaSize),
    ("AvgAsolaSize", CanonicalKey::AvgAsolaSize),
    ("avg_asola_size", CanonicalKey::AvgAsolaSize),
    ("avgSpacing", CanonicalKey::AvgSpacing),
    ("AvgSpacing", CanonicalKey::AvgSpacing),
    ("avg_spacing", CanonicalKey::AvgSpacing),
    ("velocity", CanonicalKey::Velocity),
    ("Velocity", CanonicalKey::Velocity),
    ("overlapRatio", CanonicalKey::OverlapRatio),
    ("OverlapRatio", CanonicalKey::OverlapRatio),
    ("overlap_ratio", CanonicalKey::OverlapRatio),
    ("letterConnections", CanonicalKey::LetterConnections),
    ("LetterConnections", CanonicalKey::LetterConnections),
    ("letter_connections", CanonicalKey::LetterConnections),
    ("baselineStdMm", CanonicalKey::BaselineStdMm),
    ("BaselineStdMm", CanonicalKey::BaselineStdMm),
    ("baseline_std_mm", CanonicalKey::BaselineStdMm),
    ("BaselineStd", CanonicalKey::BaselineStdMm),
    ("baselineStd", CanonicalKey::BaselineStdMm),
    ("strokeComplexity", CanonicalKey::StrokeComplexity),
    ("StrokeComplexity", CanonicalKey::StrokeComplexity),
    ("stroke_complexity", CanonicalKey::StrokeComplexity),
    ("connectedComponents", CanonicalKey::ConnectedComponents),
    ("ConnectedComponents", CanonicalKey::ConnectedComponents),
    ("connected_components", CanonicalKey::ConnectedComponents),
    ("fluidityScore", CanonicalKey::FluidityScore),
    ("FluidityScore", CanonicalKey::FluidityScore),
    ("fluidity_score", CanonicalKey::FluidityScore),
    ("pressureConsistency", CanonicalKey::PressureConsistency),
    ("PressureConsistency", CanonicalKey::PressureConsistency),
    ("pressure_consistency", CanonicalKey::PressureConsistency),
    ("coordinationIndex", CanonicalKey::CoordinationIndex),
    ("CoordinationIndex", CanonicalKey::CoordinationIndex),
    ("coordination_index", CanonicalKey::CoordinationIndex),
    ("naturalnessIndex", CanonicalKey::NaturalnessIndex),
    ("NaturalnessIndex", CanonicalKey::NaturalnessIndex),
    ("naturalness_index", CanonicalKey::NaturalnessIndex),
    ("dimensions", CanonicalKey::Dimensions),
    ("Dimensions", CanonicalKey::Dimensions),
    ("readability", CanonicalKey::Readability),
    ("Readability", CanonicalKey::Readability),
    ("writingStyle", CanonicalKey::WritingStyle),
    ("WritingStyle", CanonicalKey::WritingStyle),
    ("writing_style", CanonicalKey::WritingStyle),
    ("Style", CanonicalKey::WritingStyle),
    ("style", CanonicalKey::WritingStyle),
];

/// Canonical spelling of `name`, or `name` itself if it is not a known
/// alias.
#[must_use]
pub fn canonical_name(name: &str) -> &str {
    CanonicalKey::from_name(name).map_or(name, |key| key.as_str())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_canonical_name_maps_to_itself() {
        for key in CanonicalKey::ALL {
            assert_eq!(CanonicalKey::from_name(key.as_str()), Some(key));
            assert_eq!(canonical_name(key.as_str()), key.as_str());
        }
    }

    #[test]
    fn every_legacy_name_resolves() {
        for key in CanonicalKey::ALL {
            assert_eq!(CanonicalKey::from_name(key.legacy_name()), Some(key));
        }
    }

    #[test]
    fn aliases_are_unambiguous() {
        let mut seen = HashSet::new();
        for (alias, _) in ALIASES {
            assert!(seen.insert(*alias), "alias {alias:?} listed twice");
        }
    }

    #[test]
    fn alias_round_trip() {
        for &(alias, key) in ALIASES {
            let canonical = canonical_name(alias);
            assert_eq!(CanonicalKey::from_name(canonical), Some(key));
        }
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(canonical_name("inkColour"), "inkColour");
        assert_eq!(canonical_name("Curvature"), "avgCurvature");
    }

    #[test]
    fn borrowed_names_are_returned_as_is() {
        let owned = format!("{}Colour", "ink");
        let canonical: &str = canonical_name(&owned);
        assert_eq!(canonical, owned);
        let legacy = String::from("BaselineStd");
        assert_eq!(canonical_name(&legacy), "baselineStdMm");
    }
}
