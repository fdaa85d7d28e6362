// Season stats aggregate: one player's games for one season, per category,
// plus the history of performance assessments.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::events::SeasonEvent;
use crate::assessment::{
    AssessmentError, ParticipationAssessor, PerformanceAssessor, PerformanceScore,
};
use crate::stats::{
    BattingGame, BattingStats, FieldingGame, FieldingStats, GameSnapshot, PitchingGame,
    PitchingStats, PlayerId, Position, SeasonYear, StatCategory,
};

/// One assessment in the history. Later records supersede earlier ones; none
/// are ever removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub category: StatCategory,
    pub date: NaiveDate,
    pub score: PerformanceScore,
    pub participation_met: bool,
}

/// All stats of one player for one season.
///
/// Games are kept in insertion order and sorted on read. Uniqueness of games
/// within a category is the caller's concern (the scorekeeper diffs before
/// logging). Raised events are held until `take_events` is called and are not
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    player_id: PlayerId,
    season: SeasonYear,
    batting_games: Vec<BattingGame>,
    pitching_games: Vec<PitchingGame>,
    fielding_games: Vec<FieldingGame>,
    assessments: Vec<AssessmentRecord>,
    #[serde(skip)]
    events: Vec<SeasonEvent>,
}

/// A game snapshot that a `PlayerSeasonStats` keeps a log of.
pub trait SeasonGame: GameSnapshot {
    fn recorded(stats: &PlayerSeasonStats) -> &[Self];

    fn recorded_mut(stats: &mut PlayerSeasonStats) -> &mut Vec<Self>;

    /// Participation and score for season-to-date totals.
    fn evaluate<P, A>(
        start: NaiveDate,
        end: NaiveDate,
        totals: &Self::Totals,
        participation: &P,
        performance: &A,
    ) -> Result<(bool, PerformanceScore), AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized;
}

impl SeasonGame for BattingGame {
    fn recorded(stats: &PlayerSeasonStats) -> &[Self] {
        &stats.batting_games
    }

    fn recorded_mut(stats: &mut PlayerSeasonStats) -> &mut Vec<Self> {
        &mut stats.batting_games
    }

    fn evaluate<P, A>(
        start: NaiveDate,
        end: NaiveDate,
        totals: &BattingStats,
        participation: &P,
        performance: &A,
    ) -> Result<(bool, PerformanceScore), AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        let met = participation.assess_batting(start, end, totals);
        Ok((met, performance.assess_batting(totals)?))
    }
}

impl SeasonGame for PitchingGame {
    fn recorded(stats: &PlayerSeasonStats) -> &[Self] {
        &stats.pitching_games
    }

    fn recorded_mut(stats: &mut PlayerSeasonStats) -> &mut Vec<Self> {
        &mut stats.pitching_games
    }

    fn evaluate<P, A>(
        start: NaiveDate,
        end: NaiveDate,
        totals: &PitchingStats,
        participation: &P,
        performance: &A,
    ) -> Result<(bool, PerformanceScore), AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        let met = participation.assess_pitching(start, end, totals);
        Ok((met, performance.assess_pitching(totals)?))
    }
}

impl SeasonGame for FieldingGame {
    fn recorded(stats: &PlayerSeasonStats) -> &[Self] {
        &stats.fielding_games
    }

    fn recorded_mut(stats: &mut PlayerSeasonStats) -> &mut Vec<Self> {
        &mut stats.fielding_games
    }

    fn evaluate<P, A>(
        start: NaiveDate,
        end: NaiveDate,
        totals: &FieldingStats,
        participation: &P,
        performance: &A,
    ) -> Result<(bool, PerformanceScore), AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        let met = participation.assess_fielding(start, end, totals);
        Ok((met, performance.assess_fielding(totals)?))
    }
}

impl PlayerSeasonStats {
    pub fn new(player_id: PlayerId, season: SeasonYear) -> Self {
        PlayerSeasonStats {
            player_id,
            season,
            batting_games: Vec::new(),
            pitching_games: Vec::new(),
            fielding_games: Vec::new(),
            assessments: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn season(&self) -> SeasonYear {
        self.season
    }

    // -- Game log ----------------------------------------------------------

    /// Append a game and raise `GameLogged`.
    pub fn log_game<G: SeasonGame>(&mut self, game: G) {
        self.events.push(SeasonEvent::GameLogged {
            player_id: self.player_id,
            season: self.season,
            category: G::CATEGORY,
            game_id: game.game_id(),
            date: game.game_date(),
        });
        G::recorded_mut(self).push(game);
    }

    pub fn log_batting_game(&mut self, game: BattingGame) {
        self.log_game(game);
    }

    pub fn log_pitching_game(&mut self, game: PitchingGame) {
        self.log_game(game);
    }

    pub fn log_fielding_game(&mut self, game: FieldingGame) {
        self.log_game(game);
    }

    /// Games of one category in insertion order.
    pub fn games<G: SeasonGame>(&self) -> &[G] {
        G::recorded(self)
    }

    /// Games of one category sorted ascending by date. Games on the same
    /// date keep their insertion order.
    pub fn games_chronologically<G: SeasonGame>(&self) -> Vec<&G> {
        let mut games: Vec<&G> = G::recorded(self).iter().collect();
        games.sort_by_key(|g| g.game_date());
        games
    }

    pub fn batting_games_chronologically(&self) -> Vec<&BattingGame> {
        self.games_chronologically()
    }

    pub fn pitching_games_chronologically(&self) -> Vec<&PitchingGame> {
        self.games_chronologically()
    }

    pub fn fielding_games_chronologically(&self) -> Vec<&FieldingGame> {
        self.games_chronologically()
    }

    // -- Season totals -----------------------------------------------------

    pub fn season_batting_stats(&self) -> BattingStats {
        BattingGame::totals(&self.batting_games)
    }

    pub fn season_pitching_stats(&self) -> PitchingStats {
        PitchingGame::totals(&self.pitching_games)
    }

    pub fn season_fielding_stats(&self) -> FieldingStats {
        FieldingGame::totals(&self.fielding_games)
    }

    /// Fielding totals split by the position each game was played at.
    pub fn fielding_stats_by_position(&self) -> BTreeMap<Position, FieldingStats> {
        let mut by_position: BTreeMap<Position, FieldingStats> = BTreeMap::new();
        for game in &self.fielding_games {
            *by_position.entry(game.position).or_default() += game.stats;
        }
        by_position
    }

    // -- Assessment --------------------------------------------------------

    /// Score a category as of `as_of`, using totals of every logged game
    /// dated on or before it over the range from the first such game.
    ///
    /// The record is appended to history and `PerformanceAssessed` is raised
    /// whether or not participation was met. When both this record and the
    /// previous one for the category met participation, the two scores are
    /// compared with the assessor's change threshold and a significant change
    /// raises `PerformanceImproved` or `PerformanceDeclined`.
    pub fn assess<G, P, A>(
        &mut self,
        as_of: NaiveDate,
        participation: &P,
        performance: &A,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        G: SeasonGame,
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        let recorded = G::recorded(self);
        let start = recorded
            .iter()
            .map(|g| g.game_date())
            .filter(|d| *d <= as_of)
            .min()
            .unwrap_or(as_of);
        let totals = G::totals(recorded.iter().filter(|g| g.game_date() <= as_of));
        let (participation_met, score) =
            G::evaluate(start, as_of, &totals, participation, performance)?;

        let previous = self.latest_assessment(G::CATEGORY).copied();
        let record = AssessmentRecord {
            category: G::CATEGORY,
            date: as_of,
            score,
            participation_met,
        };
        self.assessments.push(record);
        self.events.push(SeasonEvent::PerformanceAssessed {
            player_id: self.player_id,
            season: self.season,
            category: G::CATEGORY,
            date: as_of,
            score,
            participation_met,
        });
        if let Some(previous) = previous.filter(|p| p.participation_met && participation_met) {
            self.raise_score_change(&record, previous.score, performance);
        }
        Ok(record)
    }

    fn raise_score_change<A>(
        &mut self,
        record: &AssessmentRecord,
        previous: PerformanceScore,
        performance: &A,
    ) where
        A: PerformanceAssessor + ?Sized,
    {
        let cmp = performance.compare(previous, record.score);
        let event = if cmp.is_significant_increase() {
            SeasonEvent::PerformanceImproved {
                player_id: self.player_id,
                season: self.season,
                category: record.category,
                date: record.date,
                previous,
                current: record.score,
                percentage_change: cmp.percentage_change,
            }
        } else if cmp.is_significant_decrease() {
            SeasonEvent::PerformanceDeclined {
                player_id: self.player_id,
                season: self.season,
                category: record.category,
                date: record.date,
                previous,
                current: record.score,
                percentage_change: cmp.percentage_change,
            }
        } else {
            return;
        };
        self.events.push(event);
    }

    pub fn assess_batting_performance<P, A>(
        &mut self,
        as_of: NaiveDate,
        participation: &P,
        performance: &A,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        self.assess::<BattingGame, P, A>(as_of, participation, performance)
    }

    pub fn assess_pitching_performance<P, A>(
        &mut self,
        as_of: NaiveDate,
        participation: &P,
        performance: &A,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        self.assess::<PitchingGame, P, A>(as_of, participation, performance)
    }

    pub fn assess_fielding_performance<P, A>(
        &mut self,
        as_of: NaiveDate,
        participation: &P,
        performance: &A,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        P: ParticipationAssessor + ?Sized,
        A: PerformanceAssessor + ?Sized,
    {
        self.assess::<FieldingGame, P, A>(as_of, participation, performance)
    }

    /// Every assessment, oldest first.
    pub fn assessment_history(&self) -> &[AssessmentRecord] {
        &self.assessments
    }

    pub fn assessments(&self, category: StatCategory) -> Vec<&AssessmentRecord> {
        self.assessments
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    pub fn latest_assessment(&self, category: StatCategory) -> Option<&AssessmentRecord> {
        self.assessments.iter().rev().find(|a| a.category == category)
    }

    // -- Events ------------------------------------------------------------

    pub fn pending_events(&self) -> &[SeasonEvent] {
        &self.events
    }

    /// Remove and return every raised event.
    pub fn take_events(&mut self) -> Vec<SeasonEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{
        MinMaxNormalizationAssessor, MinimumThresholdParticipationAssessor,
        NormalizationCriteria, ParticipationThresholds, StatCriterion,
    };
    use crate::stats::{BattingStat, FieldingStat, GameId, InningsCount, PitchingStat, TeamId};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn batting(id: u32, on: NaiveDate, pa: u32, hits: u32) -> BattingGame {
        BattingGame {
            player_id: PlayerId(1),
            season: SeasonYear(2024),
            game_id: GameId(id),
            game_date: on,
            team_id: TeamId(147),
            stats: BattingStats {
                plate_appearances: pa,
                at_bats: pa,
                hits,
                ..Default::default()
            },
        }
    }

    fn fielding(id: u32, on: NaiveDate, position: Position, putouts: u32) -> FieldingGame {
        FieldingGame {
            player_id: PlayerId(1),
            season: SeasonYear(2024),
            game_id: GameId(id),
            game_date: on,
            team_id: TeamId(147),
            position,
            stats: FieldingStats {
                putouts,
                innings_played: InningsCount::new(9, 0),
                ..Default::default()
            },
        }
    }

    fn participation() -> MinimumThresholdParticipationAssessor {
        MinimumThresholdParticipationAssessor::new(ParticipationThresholds {
            min_plate_appearances: 8,
            min_batters_faced: 10,
            min_innings_pitched: InningsCount::new(2, 0),
            min_total_chances: 3,
        })
    }

    fn performance() -> MinMaxNormalizationAssessor {
        MinMaxNormalizationAssessor::new(
            NormalizationCriteria::new(
                vec![StatCriterion::new(BattingStat::Hits, 1.0, false, 0.0, 10.0).unwrap()],
                vec![StatCriterion::new(PitchingStat::Strikeouts, 1.0, false, 0.0, 10.0).unwrap()],
                vec![StatCriterion::new(FieldingStat::Putouts, 1.0, false, 0.0, 10.0).unwrap()],
            )
            .unwrap(),
        )
    }

    #[test]
    fn chronological_view_sorts_on_read() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(3, date(4, 10), 4, 1));
        season.log_batting_game(batting(1, date(4, 2), 4, 2));
        season.log_batting_game(batting(2, date(4, 5), 4, 0));

        let ids: Vec<u32> = season
            .batting_games_chronologically()
            .iter()
            .map(|g| g.game_id.0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // insertion order is untouched
        assert_eq!(season.games::<BattingGame>()[0].game_id, GameId(3));
    }

    #[test]
    fn logging_raises_game_logged() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_fielding_game(fielding(9, date(4, 4), Position::ShortStop, 2));
        assert_eq!(
            season.pending_events(),
            &[SeasonEvent::GameLogged {
                player_id: PlayerId(1),
                season: SeasonYear(2024),
                category: StatCategory::Fielding,
                game_id: GameId(9),
                date: date(4, 4),
            }]
        );
    }

    #[test]
    fn assessment_uses_games_up_to_as_of() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(1, date(4, 1), 4, 2));
        season.log_batting_game(batting(2, date(4, 3), 4, 2));
        season.log_batting_game(batting(3, date(4, 9), 4, 5));

        let record = season
            .assess_batting_performance(date(4, 4), &participation(), &performance())
            .unwrap();
        assert_eq!(record.score.value(), 0.4);
        assert!(record.participation_met);
        assert_eq!(record.date, date(4, 4));

        let full = season
            .assess_batting_performance(date(4, 9), &participation(), &performance())
            .unwrap();
        assert_eq!(full.score.value(), 0.9);
    }

    fn batting_average() -> MinMaxNormalizationAssessor {
        MinMaxNormalizationAssessor::new(
            NormalizationCriteria::new(
                vec![StatCriterion::new(BattingStat::BattingAverage, 1.0, false, 0.0, 1.0).unwrap()],
                vec![StatCriterion::new(PitchingStat::Strikeouts, 1.0, false, 0.0, 10.0).unwrap()],
                vec![StatCriterion::new(FieldingStat::Putouts, 1.0, false, 0.0, 10.0).unwrap()],
            )
            .unwrap(),
        )
    }

    fn score_changes(season: &mut PlayerSeasonStats) -> Vec<SeasonEvent> {
        season
            .take_events()
            .into_iter()
            .filter(SeasonEvent::is_score_change)
            .collect()
    }

    #[test]
    fn significant_score_changes_raise_events() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        let avg = batting_average();

        // .500, nothing to compare against yet
        season.log_batting_game(batting(1, date(4, 1), 8, 4));
        season
            .assess_batting_performance(date(4, 1), &participation(), &avg)
            .unwrap();
        assert!(score_changes(&mut season).is_empty());

        // .250
        season.log_batting_game(batting(2, date(4, 8), 8, 0));
        season
            .assess_batting_performance(date(4, 8), &participation(), &avg)
            .unwrap();
        assert_eq!(
            score_changes(&mut season),
            vec![SeasonEvent::PerformanceDeclined {
                player_id: PlayerId(1),
                season: SeasonYear(2024),
                category: StatCategory::Batting,
                date: date(4, 8),
                previous: PerformanceScore::new(0.5),
                current: PerformanceScore::new(0.25),
                percentage_change: -50.0,
            }]
        );

        // .500
        season.log_batting_game(batting(3, date(4, 15), 16, 12));
        season
            .assess_batting_performance(date(4, 15), &participation(), &avg)
            .unwrap();
        let events = score_changes(&mut season);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            SeasonEvent::PerformanceImproved {
                percentage_change,
                ..
            } if percentage_change == 100.0
        ));

        // .525 is a 5% change, under the default 20% threshold
        season.log_batting_game(batting(4, date(4, 22), 8, 5));
        season
            .assess_batting_performance(date(4, 22), &participation(), &avg)
            .unwrap();
        assert!(score_changes(&mut season).is_empty());
        assert_eq!(season.assessments(StatCategory::Batting).len(), 4);
    }

    #[test]
    fn score_change_needs_participation_on_both_sides() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(1, date(4, 1), 4, 1));
        season
            .assess_batting_performance(date(4, 1), &participation(), &performance())
            .unwrap();
        season.log_batting_game(batting(2, date(4, 8), 4, 3));
        let record = season
            .assess_batting_performance(date(4, 8), &participation(), &performance())
            .unwrap();
        assert!(record.participation_met);
        assert_eq!(record.score.value(), 0.4);
        assert!(score_changes(&mut season).is_empty());
    }

    #[test]
    fn unmet_participation_still_records_and_raises() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(1, date(4, 1), 3, 1));
        season.take_events();

        let record = season
            .assess_batting_performance(date(4, 1), &participation(), &performance())
            .unwrap();
        assert!(!record.participation_met);
        assert_eq!(season.assessments(StatCategory::Batting).len(), 1);

        let events = season.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            SeasonEvent::PerformanceAssessed {
                participation_met: false,
                ..
            }
        ));
        assert!(season.pending_events().is_empty());
    }

    #[test]
    fn empty_category_assesses_to_zero_without_participation() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        let record = season
            .assess_fielding_performance(date(5, 1), &participation(), &performance())
            .unwrap();
        assert_eq!(record.score, PerformanceScore::ZERO);
        assert!(!record.participation_met);
    }

    #[test]
    fn latest_assessment_per_category() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(1, date(4, 1), 4, 1));
        season.log_fielding_game(fielding(1, date(4, 1), Position::FirstBase, 5));
        season
            .assess_batting_performance(date(4, 1), &participation(), &performance())
            .unwrap();
        season
            .assess_fielding_performance(date(4, 1), &participation(), &performance())
            .unwrap();
        season.log_batting_game(batting(2, date(4, 8), 4, 3));
        season
            .assess_batting_performance(date(4, 8), &participation(), &performance())
            .unwrap();

        assert_eq!(season.assessment_history().len(), 3);
        let latest = season.latest_assessment(StatCategory::Batting).unwrap();
        assert_eq!(latest.date, date(4, 8));
        assert_eq!(latest.score.value(), 0.4);
        let fielding = season.latest_assessment(StatCategory::Fielding).unwrap();
        assert_eq!(fielding.score.value(), 0.5);
        assert!(season.latest_assessment(StatCategory::Pitching).is_none());
    }

    #[test]
    fn fielding_totals_by_position() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_fielding_game(fielding(1, date(4, 1), Position::ShortStop, 2));
        season.log_fielding_game(fielding(2, date(4, 2), Position::SecondBase, 3));
        season.log_fielding_game(fielding(3, date(4, 3), Position::ShortStop, 4));

        let by_position = season.fielding_stats_by_position();
        assert_eq!(by_position.len(), 2);
        assert_eq!(by_position[&Position::ShortStop].putouts, 6);
        assert_eq!(by_position[&Position::SecondBase].putouts, 3);
        assert_eq!(season.season_fielding_stats().putouts, 9);
    }

    #[test]
    fn serde_round_trip_drops_pending_events() {
        let mut season = PlayerSeasonStats::new(PlayerId(1), SeasonYear(2024));
        season.log_batting_game(batting(1, date(4, 1), 4, 1));
        let json = serde_json::to_string(&season).unwrap();
        let restored: PlayerSeasonStats = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.games::<BattingGame>(), season.games::<BattingGame>());
        assert!(restored.pending_events().is_empty());
    }
}
