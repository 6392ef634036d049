//! Categorical features: readability and writing style.
//!
//! Both are derived from numeric features and stored in descriptors as
//! their English labels. Parsing is lenient so that descriptors written
//! with the historical Italian labels still compare.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::measure::Measure;
use crate::pressure::RAW_PRESSURE_SCALE;

/// Normalized pressure above which strokes are considered crisp.
pub const HIGH_READABILITY_PRESSURE: f64 = 90.0;

/// Normalized pressure above which strokes are considered legible.
pub const MEDIUM_READABILITY_PRESSURE: f64 = 60.0;

/// Width/height ratio above which a signature reads as cursive.
pub const CURSIVE_PROPORTION: f64 = 2.0;

/// Width/height ratio below which a signature reads as print.
pub const PRINT_PROPORTION: f64 = 1.2;

/// How easily the strokes can be made out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Readability {
    /// Faint or broken strokes.
    Low,
    /// Legible.
    Medium,
    /// Dark, crisp strokes.
    High,
}

impl Readability {
    /// Position on the Low < Medium < High scale.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// English label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Readability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Readability {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "bassa" | "basso" => Ok(Self::Low),
            "medium" | "media" | "medio" => Ok(Self::Medium),
            "high" | "alta" | "alto" => Ok(Self::High),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Overall letter-form style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WritingStyle {
    /// Connected, horizontally extended writing.
    Cursive,
    /// Detached, compact letters.
    Print,
    /// In between.
    Mixed,
}

impl WritingStyle {
    /// English label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cursive => "Cursive",
            Self::Print => "Print",
            Self::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingStyle {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cursive" | "corsivo" | "corsiva" => Ok(Self::Cursive),
            "print" | "stampatello" => Ok(Self::Print),
            "mixed" | "misto" | "mista" => Ok(Self::Mixed),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A categorical label that matches no known spelling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label {0:?}")]
pub struct UnknownCategory(pub String);

/// Readability from mean pressure.
///
/// `normalized` says whether `pressure_mean` is on the 0–100 scale; raw
/// 0–255 values are converted first. A neutral pressure gives a neutral
/// `Medium`.
#[must_use]
pub fn readability(pressure_mean: Measure<f64>, normalized: bool) -> Measure<Readability> {
    let to_percent = |v: f64| {
        if normalized {
            v
        } else {
            v * 100.0 / RAW_PRESSURE_SCALE
        }
    };
    match pressure_mean {
        Measure::Measured(v) => Measure::Measured(readability_for(to_percent(v))),
        Measure::Neutral { reason, .. } => Measure::neutral(Readability::Medium, reason),
    }
}

fn readability_for(percent: f64) -> Readability {
    if percent > HIGH_READABILITY_PRESSURE {
        Readability::High
    } else if percent > MEDIUM_READABILITY_PRESSURE {
        Readability::Medium
    } else {
        Readability::Low
    }
}

/// Writing style from the width/height proportion. A neutral
/// proportion gives a neutral `Mixed`.
#[must_use]
pub fn writing_style(proportion: Measure<f64>) -> Measure<WritingStyle> {
    match proportion {
        Measure::Measured(p) if p > CURSIVE_PROPORTION => Measure::Measured(WritingStyle::Cursive),
        Measure::Measured(p) if p < PRINT_PROPORTION => Measure::Measured(WritingStyle::Print),
        Measure::Measured(_) => Measure::Measured(WritingStyle::Mixed),
        Measure::Neutral { reason, .. } => Measure::neutral(WritingStyle::Mixed, reason),
    }
}
