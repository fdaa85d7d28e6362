// Performance assessment: criteria, participation gating and scoring.

pub mod criteria;
pub mod participation;
pub mod performance;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stats::StatCategory;

pub use criteria::{
    CategoryCriteria, CriteriaError, CriterionSpec, NormalizationCriteria, StatCriterion,
    WEIGHT_SUM_TOLERANCE,
};
pub use participation::{
    MinimumThresholdParticipationAssessor, ParticipationAssessor, ParticipationPolicy,
    ParticipationRates, ParticipationThresholds, ProratedParticipationAssessor,
};
pub use performance::{
    weighted_score, MinMaxNormalizationAssessor, PerformanceAssessor, ScoreComparison,
    DEFAULT_SCORE_CHANGE_THRESHOLD,
};

/// Decimal places a score is rounded to.
pub const SCORE_PRECISION: i32 = 4;

/// A composite performance score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceScore(f64);

impl PerformanceScore {
    pub const ZERO: PerformanceScore = PerformanceScore(0.0);

    /// Clamp to [0, 1] and round half away from zero to `SCORE_PRECISION` places.
    pub fn new(raw: f64) -> Self {
        let clamped = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        PerformanceScore(round_to(clamped, SCORE_PRECISION))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for PerformanceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// `f64::round` rounds half away from zero.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("{category} stats do not provide a value for `{stat}`")]
    StatLookup {
        category: StatCategory,
        stat: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rounds_half_away_from_zero() {
        // 1/32 and 5/32 are exact, so the fifth digit is a true midpoint
        assert_eq!(PerformanceScore::new(0.03125).value(), 0.0313);
        assert_eq!(PerformanceScore::new(0.15625).to_string(), "0.1563");
        assert_eq!(PerformanceScore::new(0.548_449).value(), 0.5484);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(PerformanceScore::new(1.2).value(), 1.0);
        assert_eq!(PerformanceScore::new(-0.1).value(), 0.0);
        assert_eq!(PerformanceScore::new(f64::NAN), PerformanceScore::ZERO);
    }

    #[test]
    fn lookup_error_names_stat_and_category() {
        let err = AssessmentError::StatLookup {
            category: StatCategory::Fielding,
            stat: "Errors",
        };
        assert_eq!(err.to_string(), "fielding stats do not provide a value for `Errors`");
    }
}
