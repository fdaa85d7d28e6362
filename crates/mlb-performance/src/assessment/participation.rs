// Participation: whether a player's sample size is large enough for a score
// to be trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::{BattingStats, FieldingStats, InningsCount, PitchingStats};

/// Decides if cumulative stats over `[start, end]` meet the minimum sample
/// size. The range is inclusive of both ends.
pub trait ParticipationAssessor {
    fn assess_batting(&self, start: NaiveDate, end: NaiveDate, stats: &BattingStats) -> bool;
    fn assess_pitching(&self, start: NaiveDate, end: NaiveDate, stats: &PitchingStats) -> bool;
    fn assess_fielding(&self, start: NaiveDate, end: NaiveDate, stats: &FieldingStats) -> bool;
}

impl<T: ParticipationAssessor + ?Sized> ParticipationAssessor for &T {
    fn assess_batting(&self, start: NaiveDate, end: NaiveDate, stats: &BattingStats) -> bool {
        (**self).assess_batting(start, end, stats)
    }

    fn assess_pitching(&self, start: NaiveDate, end: NaiveDate, stats: &PitchingStats) -> bool {
        (**self).assess_pitching(start, end, stats)
    }

    fn assess_fielding(&self, start: NaiveDate, end: NaiveDate, stats: &FieldingStats) -> bool {
        (**self).assess_fielding(start, end, stats)
    }
}

// ---------------------------------------------------------------------------
// Fixed thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationThresholds {
    pub min_plate_appearances: u32,
    pub min_batters_faced: u32,
    pub min_innings_pitched: InningsCount,
    pub min_total_chances: u32,
}

/// Compares season-to-date totals against fixed minimums. The date range is
/// ignored. Meeting a minimum exactly counts as met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumThresholdParticipationAssessor {
    thresholds: ParticipationThresholds,
}

impl MinimumThresholdParticipationAssessor {
    pub fn new(thresholds: ParticipationThresholds) -> Self {
        MinimumThresholdParticipationAssessor { thresholds }
    }

    pub fn thresholds(&self) -> &ParticipationThresholds {
        &self.thresholds
    }
}

impl ParticipationAssessor for MinimumThresholdParticipationAssessor {
    fn assess_batting(&self, _start: NaiveDate, _end: NaiveDate, stats: &BattingStats) -> bool {
        stats.plate_appearances >= self.thresholds.min_plate_appearances
    }

    /// Both batters faced and innings pitched must reach their minimums.
    fn assess_pitching(&self, _start: NaiveDate, _end: NaiveDate, stats: &PitchingStats) -> bool {
        stats.batters_faced >= self.thresholds.min_batters_faced
            && stats.innings_pitched >= self.thresholds.min_innings_pitched
    }

    fn assess_fielding(&self, _start: NaiveDate, _end: NaiveDate, stats: &FieldingStats) -> bool {
        stats.total_chances() >= self.thresholds.min_total_chances
    }
}

// ---------------------------------------------------------------------------
// Prorated thresholds
// ---------------------------------------------------------------------------

const GAMES_IN_SEASON: f64 = 162.0;
const DAYS_IN_SEASON: f64 = 189.0;

/// Per-game minimums, scaled by the estimated games in a date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticipationRates {
    pub plate_appearances_per_game: f64,
    pub batters_faced_per_game: f64,
    pub total_chances_per_game: f64,
}

impl Default for ParticipationRates {
    fn default() -> Self {
        ParticipationRates {
            plate_appearances_per_game: 2.1,
            batters_faced_per_game: 1.25,
            total_chances_per_game: 0.5,
        }
    }
}

/// Scales per-game minimums by the games a team plays over the range,
/// estimated from a 162 game, 189 day season.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProratedParticipationAssessor {
    rates: ParticipationRates,
}

impl ProratedParticipationAssessor {
    pub fn new(rates: ParticipationRates) -> Self {
        ProratedParticipationAssessor { rates }
    }

    pub fn rates(&self) -> &ParticipationRates {
        &self.rates
    }

    /// Estimated team games over the inclusive range. An inverted range is
    /// zero games.
    pub fn estimated_games(start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days() + 1;
        days.max(0) as f64 * GAMES_IN_SEASON / DAYS_IN_SEASON
    }

    fn required(rate: f64, start: NaiveDate, end: NaiveDate) -> f64 {
        rate * Self::estimated_games(start, end)
    }
}

impl ParticipationAssessor for ProratedParticipationAssessor {
    fn assess_batting(&self, start: NaiveDate, end: NaiveDate, stats: &BattingStats) -> bool {
        stats.plate_appearances as f64
            >= Self::required(self.rates.plate_appearances_per_game, start, end)
    }

    fn assess_pitching(&self, start: NaiveDate, end: NaiveDate, stats: &PitchingStats) -> bool {
        stats.batters_faced as f64 >= Self::required(self.rates.batters_faced_per_game, start, end)
    }

    fn assess_fielding(&self, start: NaiveDate, end: NaiveDate, stats: &FieldingStats) -> bool {
        stats.total_chances() as f64
            >= Self::required(self.rates.total_chances_per_game, start, end)
    }
}

// ---------------------------------------------------------------------------
// Configured policy
// ---------------------------------------------------------------------------

/// The participation policy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticipationPolicy {
    Fixed(MinimumThresholdParticipationAssessor),
    Prorated(ProratedParticipationAssessor),
}

impl ParticipationAssessor for ParticipationPolicy {
    fn assess_batting(&self, start: NaiveDate, end: NaiveDate, stats: &BattingStats) -> bool {
        match self {
            ParticipationPolicy::Fixed(a) => a.assess_batting(start, end, stats),
            ParticipationPolicy::Prorated(a) => a.assess_batting(start, end, stats),
        }
    }

    fn assess_pitching(&self, start: NaiveDate, end: NaiveDate, stats: &PitchingStats) -> bool {
        match self {
            ParticipationPolicy::Fixed(a) => a.assess_pitching(start, end, stats),
            ParticipationPolicy::Prorated(a) => a.assess_pitching(start, end, stats),
        }
    }

    fn assess_fielding(&self, start: NaiveDate, end: NaiveDate, stats: &FieldingStats) -> bool {
        match self {
            ParticipationPolicy::Fixed(a) => a.assess_fielding(start, end, stats),
            ParticipationPolicy::Prorated(a) => a.assess_fielding(start, end, stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn thresholds() -> ParticipationThresholds {
        ParticipationThresholds {
            min_plate_appearances: 26,
            min_batters_faced: 15,
            min_innings_pitched: InningsCount::new(3, 0),
            min_total_chances: 6,
        }
    }

    fn batting(pa: u32) -> BattingStats {
        BattingStats {
            plate_appearances: pa,
            ..Default::default()
        }
    }

    #[test]
    fn fixed_threshold_equality_counts_as_met() {
        let a = MinimumThresholdParticipationAssessor::new(thresholds());
        assert!(a.assess_batting(date(4, 1), date(4, 14), &batting(26)));
        assert!(!a.assess_batting(date(4, 1), date(4, 14), &batting(25)));
    }

    #[test]
    fn fixed_threshold_ignores_range_length() {
        let a = MinimumThresholdParticipationAssessor::new(thresholds());
        assert!(a.assess_batting(date(4, 1), date(9, 30), &batting(26)));
        assert!(a.assess_batting(date(4, 1), date(4, 1), &batting(26)));
    }

    #[test]
    fn fixed_pitching_needs_innings_and_batters_faced() {
        let a = MinimumThresholdParticipationAssessor::new(thresholds());
        let enough = PitchingStats {
            batters_faced: 15,
            innings_pitched: InningsCount::new(3, 0),
            ..Default::default()
        };
        assert!(a.assess_pitching(date(4, 1), date(4, 14), &enough));

        let short = PitchingStats {
            innings_pitched: InningsCount::new(2, 2),
            ..enough
        };
        assert!(!a.assess_pitching(date(4, 1), date(4, 14), &short));
    }

    #[test]
    fn fixed_fielding_uses_total_chances() {
        let a = MinimumThresholdParticipationAssessor::new(thresholds());
        let stats = FieldingStats {
            assists: 3,
            putouts: 2,
            errors: 1,
            ..Default::default()
        };
        assert!(a.assess_fielding(date(4, 1), date(4, 14), &stats));
        let fewer = FieldingStats { errors: 0, ..stats };
        assert!(!a.assess_fielding(date(4, 1), date(4, 14), &fewer));
    }

    #[test]
    fn prorated_fourteen_day_boundary() {
        // 14 days is 12 games, so 25.2 plate appearances are required
        let a = ProratedParticipationAssessor::default();
        assert!(a.assess_batting(date(4, 1), date(4, 14), &batting(26)));
        assert!(!a.assess_batting(date(4, 1), date(4, 14), &batting(25)));
    }

    #[test]
    fn prorated_estimate_is_inclusive() {
        let games = ProratedParticipationAssessor::estimated_games(date(4, 1), date(4, 14));
        assert!((games - 12.0).abs() < 1e-9);
        assert_eq!(
            ProratedParticipationAssessor::estimated_games(date(4, 2), date(4, 1)),
            0.0
        );
    }

    #[test]
    fn prorated_pitching_and_fielding() {
        let a = ProratedParticipationAssessor::default();
        // 12 games: 15 batters faced, 6 chances
        let pitching = PitchingStats {
            batters_faced: 15,
            ..Default::default()
        };
        assert!(a.assess_pitching(date(4, 1), date(4, 14), &pitching));
        let fielding = FieldingStats {
            putouts: 5,
            ..Default::default()
        };
        assert!(!a.assess_fielding(date(4, 1), date(4, 14), &fielding));
    }

    #[test]
    fn policy_dispatches_to_selected_assessor() {
        let fixed = ParticipationPolicy::Fixed(MinimumThresholdParticipationAssessor::new(
            thresholds(),
        ));
        let prorated = ParticipationPolicy::Prorated(ProratedParticipationAssessor::default());
        // A season-long range raises the prorated bar far above 26
        assert!(fixed.assess_batting(date(4, 1), date(9, 30), &batting(26)));
        assert!(!prorated.assess_batting(date(4, 1), date(9, 30), &batting(26)));
    }
}
