//! Measured-or-neutral feature values.
//!
//! Feature extraction is total: a feature that cannot be computed on a
//! given mask (too few contours, zero-length chains, no loops, …) still
//! produces a value, the documented neutral default. [`Measure`] keeps
//! the two cases apart so tests and diagnostics never have to guess
//! whether a `0.0` was observed or substituted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a feature fell back to its neutral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralReason {
    /// The mask has no ink at the resolution the feature reads.
    NoInk,
    /// Fewer contours than the feature needs.
    TooFewContours,
    /// No contour passed the feature's size or shape filters.
    NoQualifyingContour,
    /// A divisor (length, area, mean) was zero.
    Degenerate,
}

impl fmt::Display for NeutralReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInk => f.write_str("no ink"),
            Self::TooFewContours => f.write_str("too few contours"),
            Self::NoQualifyingContour => f.write_str("no qualifying contour"),
            Self::Degenerate => f.write_str("degenerate geometry"),
        }
    }
}

/// A feature value together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Measure<T> {
    /// Computed from the image.
    Measured(T),
    /// Substituted default.
    Neutral {
        /// The default value.
        value: T,
        /// Why no measurement was possible.
        reason: NeutralReason,
    },
}

impl<T: Copy> Measure<T> {
    /// Construct a neutral value.
    #[must_use]
    pub const fn neutral(value: T, reason: NeutralReason) -> Self {
        Self::Neutral { value, reason }
    }

    /// The value, regardless of origin.
    #[must_use]
    pub const fn value(&self) -> T {
        match *self {
            Self::Measured(v) | Self::Neutral { value: v, .. } => v,
        }
    }

    /// Returns `true` for a substituted default.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral { .. })
    }

    /// The fallback reason, if the value was substituted.
    #[must_use]
    pub const fn reason(&self) -> Option<NeutralReason> {
        match *self {
            Self::Measured(_) => None,
            Self::Neutral { reason, .. } => Some(reason),
        }
    }
}

impl Measure<f64> {
    /// `Measured(value)` if finite, otherwise `neutral` with
    /// [`NeutralReason::Degenerate`].
    #[must_use]
    pub fn finite_or(value: f64, neutral: f64) -> Self {
        if value.is_finite() {
            Self::Measured(value)
        } else {
            Self::neutral(neutral, NeutralReason::Degenerate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measured_and_neutral_are_distinguishable() {
        let measured = Measure::Measured(0.0_f64);
        let neutral = Measure::neutral(0.0, NeutralReason::NoInk);
        assert!((measured.value() - neutral.value()).abs() < f64::EPSILON);
        assert!(!measured.is_neutral());
        assert!(neutral.is_neutral());
        assert_eq!(neutral.reason(), Some(NeutralReason::NoInk));
        assert_eq!(measured.reason(), None);
    }

    #[test]
    fn non_finite_values_become_neutral() {
        assert!(Measure::finite_or(f64::NAN, 50.0).is_neutral());
        assert!(Measure::finite_or(f64::INFINITY, 0.0).is_neutral());
        assert_eq!(Measure::finite_or(1.5, 0.0), Measure::Measured(1.5));
    }
}
