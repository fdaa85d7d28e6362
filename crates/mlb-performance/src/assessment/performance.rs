// Weighted min-max normalization scoring.

use serde::Serialize;

use super::criteria::{CategoryCriteria, NormalizationCriteria};
use super::{round_to, AssessmentError, PerformanceScore};
use crate::stats::{BattingStats, FieldingStats, PitchingStats, StatKey, StatSource};

/// Percent change between two scores that counts as significant, unless
/// configured otherwise.
pub const DEFAULT_SCORE_CHANGE_THRESHOLD: f64 = 20.0;

/// Scores cumulative stats of each category.
pub trait PerformanceAssessor {
    fn assess_batting(&self, stats: &BattingStats) -> Result<PerformanceScore, AssessmentError>;
    fn assess_pitching(&self, stats: &PitchingStats) -> Result<PerformanceScore, AssessmentError>;
    fn assess_fielding(&self, stats: &FieldingStats) -> Result<PerformanceScore, AssessmentError>;

    fn score_change_threshold(&self) -> f64 {
        DEFAULT_SCORE_CHANGE_THRESHOLD
    }

    /// Compare two scores against this assessor's change threshold.
    fn compare(&self, reference: PerformanceScore, current: PerformanceScore) -> ScoreComparison {
        ScoreComparison::new(reference, current, self.score_change_threshold())
    }
}

impl<T: PerformanceAssessor + ?Sized> PerformanceAssessor for &T {
    fn assess_batting(&self, stats: &BattingStats) -> Result<PerformanceScore, AssessmentError> {
        (**self).assess_batting(stats)
    }

    fn assess_pitching(&self, stats: &PitchingStats) -> Result<PerformanceScore, AssessmentError> {
        (**self).assess_pitching(stats)
    }

    fn assess_fielding(&self, stats: &FieldingStats) -> Result<PerformanceScore, AssessmentError> {
        (**self).assess_fielding(stats)
    }

    fn score_change_threshold(&self) -> f64 {
        (**self).score_change_threshold()
    }
}

/// Sum of every criterion's weighted, normalized contribution.
///
/// Works against any view that can resolve the category's keys. A key the
/// view cannot resolve fails the whole score with `StatLookup`.
pub fn weighted_score<K, S>(
    stats: &S,
    criteria: &CategoryCriteria<K>,
) -> Result<PerformanceScore, AssessmentError>
where
    K: StatKey,
    S: StatSource<K> + ?Sized,
{
    let mut total = 0.0;
    for criterion in criteria.iter() {
        let raw = stats
            .stat_value(criterion.stat())
            .ok_or(AssessmentError::StatLookup {
                category: K::CATEGORY,
                stat: criterion.stat().name(),
            })?;
        total += criterion.contribution(raw);
    }
    Ok(PerformanceScore::new(total))
}

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxNormalizationAssessor {
    criteria: NormalizationCriteria,
    score_change_threshold: f64,
}

impl MinMaxNormalizationAssessor {
    pub fn new(criteria: NormalizationCriteria) -> Self {
        MinMaxNormalizationAssessor {
            criteria,
            score_change_threshold: DEFAULT_SCORE_CHANGE_THRESHOLD,
        }
    }

    pub fn with_score_change_threshold(mut self, threshold_pct: f64) -> Self {
        self.score_change_threshold = threshold_pct;
        self
    }

    pub fn criteria(&self) -> &NormalizationCriteria {
        &self.criteria
    }
}

impl PerformanceAssessor for MinMaxNormalizationAssessor {
    fn assess_batting(&self, stats: &BattingStats) -> Result<PerformanceScore, AssessmentError> {
        weighted_score(stats, self.criteria.batting())
    }

    /// A pitcher who has not thrown a pitch scores zero.
    fn assess_pitching(&self, stats: &PitchingStats) -> Result<PerformanceScore, AssessmentError> {
        if stats.number_of_pitches == 0 {
            return Ok(PerformanceScore::ZERO);
        }
        weighted_score(stats, self.criteria.pitching())
    }

    fn assess_fielding(&self, stats: &FieldingStats) -> Result<PerformanceScore, AssessmentError> {
        weighted_score(stats, self.criteria.fielding())
    }

    fn score_change_threshold(&self) -> f64 {
        self.score_change_threshold
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Percentage change from one score to another, judged against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComparison {
    pub reference: PerformanceScore,
    pub current: PerformanceScore,
    /// Rounded to two decimal places. A zero reference is treated as 1.
    pub percentage_change: f64,
    pub threshold: f64,
}

impl ScoreComparison {
    pub fn new(reference: PerformanceScore, current: PerformanceScore, threshold_pct: f64) -> Self {
        let base = if reference.value() == 0.0 {
            1.0
        } else {
            reference.value()
        };
        let change = 100.0 * (current.value() - reference.value()) / base;
        ScoreComparison {
            reference,
            current,
            percentage_change: round_to(change, 2),
            threshold: threshold_pct,
        }
    }

    pub fn is_significant_increase(&self) -> bool {
        self.percentage_change > 0.0 && self.percentage_change >= self.threshold
    }

    pub fn is_significant_decrease(&self) -> bool {
        self.percentage_change < 0.0 && -self.percentage_change >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::StatCriterion;
    use crate::stats::{BattingStat, FieldingStat, PitchingStat};

    fn single(invert: bool) -> CategoryCriteria<BattingStat> {
        CategoryCriteria::new(vec![StatCriterion::new(
            BattingStat::Hits,
            1.0,
            invert,
            1.0,
            100.0,
        )
        .unwrap()])
        .unwrap()
    }

    fn hits(n: u32) -> BattingStats {
        BattingStats {
            hits: n,
            ..Default::default()
        }
    }

    #[test]
    fn inverted_criterion_scores_low_values_high() {
        let criteria = single(true);
        assert_eq!(weighted_score(&hits(1), &criteria).unwrap().value(), 1.0);
        assert_eq!(weighted_score(&hits(100), &criteria).unwrap().value(), 0.0);
    }

    #[test]
    fn plain_criterion_scores_high_values_high() {
        let criteria = single(false);
        assert_eq!(weighted_score(&hits(1), &criteria).unwrap().value(), 0.0);
        assert_eq!(weighted_score(&hits(100), &criteria).unwrap().value(), 1.0);
    }

    #[test]
    fn weighted_combination() {
        let criteria = CategoryCriteria::new(vec![
            StatCriterion::new(BattingStat::Hits, 0.2, false, 1.0, 100.0).unwrap(),
            StatCriterion::new(BattingStat::Runs, 0.5, false, 1.0, 100.0).unwrap(),
            StatCriterion::new(BattingStat::Strikeouts, 0.3, true, 1.0, 100.0).unwrap(),
        ])
        .unwrap();
        let stats = BattingStats {
            hits: 80,
            runs: 60,
            strikeouts: 70,
            ..Default::default()
        };
        // 0.2 * 79/99 + 0.5 * 59/99 + 0.3 * (1 - 69/99) = 54.3 / 99
        let score = weighted_score(&stats, &criteria).unwrap();
        assert_eq!(score.value(), 0.5485);
    }

    #[test]
    fn score_stays_in_unit_range_for_extreme_inputs() {
        let criteria = CategoryCriteria::new(vec![
            StatCriterion::new(BattingStat::Hits, 0.25, false, 10.0, 20.0).unwrap(),
            StatCriterion::new(BattingStat::Strikeouts, 0.25, true, 10.0, 20.0).unwrap(),
            StatCriterion::new(BattingStat::BattingAverage, 0.5, false, 0.2, 0.35).unwrap(),
        ])
        .unwrap();
        for (h, k, ab) in [(0, 0, 0), (500, 0, 501), (0, 500, 1), (10_000, 15, 3)] {
            let stats = BattingStats {
                hits: h,
                strikeouts: k,
                at_bats: ab,
                ..Default::default()
            };
            let score = weighted_score(&stats, &criteria).unwrap().value();
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    /// A view that only knows putouts.
    struct PutoutsOnly(u32);

    impl StatSource<FieldingStat> for PutoutsOnly {
        fn stat_value(&self, key: FieldingStat) -> Option<f64> {
            match key {
                FieldingStat::Putouts => Some(self.0 as f64),
                _ => None,
            }
        }
    }

    #[test]
    fn unresolvable_stat_is_a_lookup_error() {
        let criteria = CategoryCriteria::new(vec![
            StatCriterion::new(FieldingStat::Putouts, 0.5, false, 0.0, 10.0).unwrap(),
            StatCriterion::new(FieldingStat::Errors, 0.5, true, 0.0, 10.0).unwrap(),
        ])
        .unwrap();
        let err = weighted_score(&PutoutsOnly(4), &criteria).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::StatLookup {
                category: crate::stats::StatCategory::Fielding,
                stat: "Errors",
            }
        );
    }

    fn assessor() -> MinMaxNormalizationAssessor {
        let criteria = NormalizationCriteria::new(
            vec![StatCriterion::new(BattingStat::Hits, 1.0, false, 0.0, 10.0).unwrap()],
            vec![StatCriterion::new(PitchingStat::EarnedRunAverage, 1.0, true, 0.0, 9.0).unwrap()],
            vec![StatCriterion::new(FieldingStat::Errors, 1.0, true, 0.0, 10.0).unwrap()],
        )
        .unwrap();
        MinMaxNormalizationAssessor::new(criteria)
    }

    #[test]
    fn pitcher_without_pitches_scores_zero() {
        // ERA of 0 would otherwise score a perfect 1.0
        let score = assessor().assess_pitching(&PitchingStats::default()).unwrap();
        assert_eq!(score, PerformanceScore::ZERO);
    }

    #[test]
    fn assessor_uses_category_criteria() {
        let a = assessor();
        assert_eq!(a.assess_batting(&hits(5)).unwrap().value(), 0.5);
        let fielding = FieldingStats {
            errors: 2,
            ..Default::default()
        };
        assert_eq!(a.assess_fielding(&fielding).unwrap().value(), 0.8);
    }

    #[test]
    fn comparison_percentage_change() {
        let cmp = ScoreComparison::new(PerformanceScore::new(0.5), PerformanceScore::new(0.65), 20.0);
        assert_eq!(cmp.percentage_change, 30.0);
        assert!(cmp.is_significant_increase());
        assert!(!cmp.is_significant_decrease());

        let small = ScoreComparison::new(PerformanceScore::new(0.5), PerformanceScore::new(0.45), 20.0);
        assert_eq!(small.percentage_change, -10.0);
        assert!(!small.is_significant_decrease());
    }

    #[test]
    fn comparison_treats_zero_reference_as_one() {
        let cmp = ScoreComparison::new(PerformanceScore::ZERO, PerformanceScore::new(0.25), 20.0);
        assert_eq!(cmp.percentage_change, 25.0);
        assert!(cmp.is_significant_increase());
    }

    #[test]
    fn assessor_compare_uses_configured_threshold() {
        let a = assessor().with_score_change_threshold(50.0);
        let cmp = a.compare(PerformanceScore::new(0.4), PerformanceScore::new(0.2));
        assert_eq!(cmp.percentage_change, -50.0);
        assert!(cmp.is_significant_decrease());
    }

    #[test]
    fn default_threshold_applies_through_references() {
        let a = assessor();
        let by_ref: &dyn PerformanceAssessor = &a;
        assert_eq!(by_ref.score_change_threshold(), DEFAULT_SCORE_CHANGE_THRESHOLD);
        let cmp = (&a).compare(PerformanceScore::new(0.5), PerformanceScore::new(0.55));
        assert_eq!(cmp.percentage_change, 10.0);
        assert!(!cmp.is_significant_increase());
    }
}
