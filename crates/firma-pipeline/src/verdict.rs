//! Two-axis verdict: similarity × naturalness.
//!
//! The decision table is evaluated strictly top to bottom and the first
//! matching rule wins. Similarity `s` is the final similarity on a 0–100
//! scale, naturalness `n` the average naturalness index (0–100).
//!
//! | # | condition                         | verdict                              | conf. |
//! |---|-----------------------------------|--------------------------------------|-------|
//! | 1 | s ≥ 98                            | Authentic                            | 98    |
//! | 2 | s ≥ 85, n ≥ 80                    | Authentic                            | 95    |
//! | 3 | s ≥ 85, n < 60                    | Possible skilled copy                | 70    |
//! | 4 | 55 ≤ s < 65, n ≥ 80               | Authentic but deliberately disguised | 85    |
//! | 5 | s < 55, n ≥ 80                    | Suspicious                           | 75    |
//! | 6 | s < 65, n < 60                    | Probably forged                      | 90    |
//! | 7 | 65 ≤ s < 85, n ≥ 75               | Probably authentic                   | 75    |
//! |   | 65 ≤ s < 85, n < 50               | Suspicious                           | 60    |
//! |   | 65 ≤ s < 85, otherwise            | Uncertain                            | 50    |
//! | 8 | 60 ≤ n < 80, s ≥ 75               | Probably authentic                   | 75    |
//! |   | 60 ≤ n < 80, otherwise            | Suspicious                           | 65    |
//! | 9 | anything else                     | Uncertain                            | 50    |
//!
//! For finite inputs rule 9 is unreachable; it only catches `NaN`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The questioned signature matches the reference writer.
    #[serde(rename = "Authentic")]
    Authentic,
    /// Close match but laboured execution.
    #[serde(rename = "Possible skilled copy")]
    PossibleSkilledCopy,
    /// The reference writer, deliberately altering their signature.
    #[serde(rename = "Authentic but deliberately disguised")]
    AuthenticDisguised,
    /// Warrants closer examination.
    #[serde(rename = "Suspicious")]
    Suspicious,
    /// Strong indicators of forgery.
    #[serde(rename = "Probably forged")]
    ProbablyForged,
    /// Leaning authentic.
    #[serde(rename = "Probably authentic")]
    ProbablyAuthentic,
    /// No conclusion.
    #[serde(rename = "Uncertain")]
    Uncertain,
}

impl Verdict {
    /// Human-readable label, as serialized.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authentic => "Authentic",
            Self::PossibleSkilledCopy => "Possible skilled copy",
            Self::AuthenticDisguised => "Authentic but deliberately disguised",
            Self::Suspicious => "Suspicious",
            Self::ProbablyForged => "Probably forged",
            Self::ProbablyAuthentic => "Probably authentic",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which row of the decision table fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// Rule 1.
    NearIdentical,
    /// Rule 2.
    SimilarAndNatural,
    /// Rule 3.
    SimilarButUnnatural,
    /// Rule 4.
    DisguisedOwnHand,
    /// Rule 5.
    DissimilarButNatural,
    /// Rule 6.
    DissimilarAndUnnatural,
    /// Rule 7, high naturalness.
    IntermediateNatural,
    /// Rule 7, low naturalness.
    IntermediateUnnatural,
    /// Rule 7, in between.
    IntermediateUndetermined,
    /// Rule 8, acceptable similarity.
    ModerateNaturalnessSimilar,
    /// Rule 8, low similarity.
    ModerateNaturalnessDissimilar,
    /// Rule 9.
    Fallback,
}

impl DecisionRule {
    /// Row number in the decision table.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::NearIdentical => 1,
            Self::SimilarAndNatural => 2,
            Self::SimilarButUnnatural => 3,
            Self::DisguisedOwnHand => 4,
            Self::DissimilarButNatural => 5,
            Self::DissimilarAndUnnatural => 6,
            Self::IntermediateNatural | Self::IntermediateUnnatural | Self::IntermediateUndetermined => 7,
            Self::ModerateNaturalnessSimilar | Self::ModerateNaturalnessDissimilar => 8,
            Self::Fallback => 9,
        }
    }

    /// Verdict, confidence and explanation attached to the rule.
    #[must_use]
    pub const fn outcome(self) -> (Verdict, u8, &'static str) {
        match self {
            Self::NearIdentical => (
                Verdict::Authentic,
                98,
                "Near-identical to the reference: structure and measured parameters match almost perfectly.",
            ),
            Self::SimilarAndNatural => (
                Verdict::Authentic,
                95,
                "High similarity with fluent, natural execution, consistent with the reference writer.",
            ),
            Self::SimilarButUnnatural => (
                Verdict::PossibleSkilledCopy,
                70,
                "High similarity but laboured, unnatural execution, typical of a careful imitation.",
            ),
            Self::DisguisedOwnHand => (
                Verdict::AuthenticDisguised,
                85,
                "Moderate similarity with natural execution: the writer may have altered their own signature on purpose.",
            ),
            Self::DissimilarButNatural => (
                Verdict::Suspicious,
                75,
                "Low similarity despite natural execution: fluent writing that does not match the reference.",
            ),
            Self::DissimilarAndUnnatural => (
                Verdict::ProbablyForged,
                90,
                "Low similarity and unnatural execution: strong indicators of forgery.",
            ),
            Self::IntermediateNatural => (
                Verdict::ProbablyAuthentic,
                75,
                "Intermediate similarity with good naturalness, compatible with natural variation of the writer.",
            ),
            Self::IntermediateUnnatural => (
                Verdict::Suspicious,
                60,
                "Intermediate similarity with poor naturalness, showing signs of imitation.",
            ),
            Self::IntermediateUndetermined => (
                Verdict::Uncertain,
                50,
                "Intermediate similarity and naturalness: no firm conclusion, expert review required.",
            ),
            Self::ModerateNaturalnessSimilar => (
                Verdict::ProbablyAuthentic,
                75,
                "Moderate naturalness with acceptable similarity to the reference.",
            ),
            Self::ModerateNaturalnessDissimilar => (
                Verdict::Suspicious,
                65,
                "Moderate naturalness with low similarity: the differences warrant scrutiny.",
            ),
            Self::Fallback => (
                Verdict::Uncertain,
                50,
                "The measurements do not support a conclusion.",
            ),
        }
    }
}

/// A verdict with its confidence, explanation and the rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The verdict.
    pub verdict: Verdict,
    /// Confidence in percent.
    pub confidence: u8,
    /// One-sentence rationale.
    pub explanation: String,
    /// The decision-table row that produced the verdict.
    pub rule: DecisionRule,
}

impl From<DecisionRule> for Classification {
    fn from(rule: DecisionRule) -> Self {
        let (verdict, confidence, explanation) = rule.outcome();
        Self {
            verdict,
            confidence,
            explanation: explanation.to_string(),
            rule,
        }
    }
}

/// Pick the first matching rule for `similarity` (0–1) and
/// `naturalness` (0–100).
#[must_use]
pub fn decide(similarity: f64, naturalness: f64) -> DecisionRule {
    let s = similarity * 100.0;
    let n = naturalness;

    if s >= 98.0 {
        DecisionRule::NearIdentical
    } else if s >= 85.0 && n >= 80.0 {
        DecisionRule::SimilarAndNatural
    } else if s >= 85.0 && n < 60.0 {
        DecisionRule::SimilarButUnnatural
    } else if (55.0..65.0).contains(&s) && n >= 80.0 {
        DecisionRule::DisguisedOwnHand
    } else if s < 55.0 && n >= 80.0 {
        DecisionRule::DissimilarButNatural
    } else if s < 65.0 && n < 60.0 {
        DecisionRule::DissimilarAndUnnatural
    } else if (65.0..85.0).contains(&s) {
        if n >= 75.0 {
            DecisionRule::IntermediateNatural
        } else if n < 50.0 {
            DecisionRule::IntermediateUnnatural
        } else {
            DecisionRule::IntermediateUndetermined
        }
    } else if (60.0..80.0).contains(&n) {
        if s >= 75.0 {
            DecisionRule::ModerateNaturalnessSimilar
        } else {
            DecisionRule::ModerateNaturalnessDissimilar
        }
    } else {
        DecisionRule::Fallback
    }
}

/// [`decide`] and attach the rule's outcome.
#[must_use]
pub fn classify(similarity: f64, naturalness: f64) -> Classification {
    decide(similarity, naturalness).into()
}
