// Scorekeeper: appends unseen games to a season aggregate and assesses
// performance on qualifying dates.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, info, warn};

use super::aggregate::{PlayerSeasonStats, SeasonGame};
use crate::assessment::{AssessmentError, ParticipationAssessor, PerformanceAssessor};
use crate::stats::{BattingGame, FieldingGame, GameId, PitchingGame};

/// Decides which dates trigger an assessment.
pub trait AssessmentSchedule {
    fn should_assess(&self, date: NaiveDate) -> bool;
}

/// Assess once a week, on the given weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyAssessment(pub Weekday);

impl AssessmentSchedule for WeeklyAssessment {
    fn should_assess(&self, date: NaiveDate) -> bool {
        date.weekday() == self.0
    }
}

impl<F> AssessmentSchedule for F
where
    F: Fn(NaiveDate) -> bool,
{
    fn should_assess(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

pub struct Scorekeeper<P, A, S> {
    participation: P,
    performance: A,
    schedule: S,
}

impl<P, A, S> Scorekeeper<P, A, S>
where
    P: ParticipationAssessor,
    A: PerformanceAssessor,
    S: AssessmentSchedule,
{
    pub fn new(participation: P, performance: A, schedule: S) -> Self {
        Scorekeeper {
            participation,
            performance,
            schedule,
        }
    }

    /// Bring `season` up to date with the incoming snapshots.
    ///
    /// Each category is handled independently. Snapshots already recorded
    /// (by full value equality) are ignored, so feeding the same data twice
    /// changes nothing. Unseen snapshots are appended oldest first, and after
    /// the last unseen game of each qualifying date that category is assessed
    /// on season-to-date totals as of that date.
    pub fn score_season(
        &self,
        mut season: PlayerSeasonStats,
        batting: &[BattingGame],
        pitching: &[PitchingGame],
        fielding: &[FieldingGame],
    ) -> Result<PlayerSeasonStats, AssessmentError> {
        self.ingest(&mut season, batting)?;
        self.ingest(&mut season, pitching)?;
        self.ingest(&mut season, fielding)?;
        Ok(season)
    }

    /// Log the unseen games of one category and assess it on qualifying
    /// dates.
    ///
    /// A category is assessed at most once per qualifying date, after the
    /// last unseen game of that date has been logged, rather than after every
    /// appended game. A doubleheader therefore yields a single score that
    /// covers both games.
    fn ingest<G: SeasonGame>(
        &self,
        season: &mut PlayerSeasonStats,
        incoming: &[G],
    ) -> Result<(), AssessmentError> {
        let mut unseen = unseen_games(season, incoming);
        if unseen.is_empty() {
            debug!(
                "no new {} games for player {} in {}",
                G::CATEGORY,
                season.player_id(),
                season.season()
            );
            return Ok(());
        }
        unseen.sort_by_key(|g| g.game_date());

        let dates: Vec<NaiveDate> = unseen.iter().map(|g| g.game_date()).collect();
        for (idx, game) in unseen.into_iter().enumerate() {
            let date = dates[idx];
            debug!(
                "logging {} game {} on {} for player {}",
                G::CATEGORY,
                game.game_id(),
                date,
                season.player_id()
            );
            season.log_game(game);

            let closes_date = dates.get(idx + 1).map_or(true, |next| *next != date);
            if closes_date && self.schedule.should_assess(date) {
                let record =
                    season.assess::<G, P, A>(date, &self.participation, &self.performance)?;
                info!(
                    "assessed {} for player {} as of {}: score {} (participation met: {})",
                    G::CATEGORY,
                    season.player_id(),
                    date,
                    record.score,
                    record.participation_met
                );
            }
        }
        Ok(())
    }
}

/// Incoming games that are not yet recorded, in input order.
///
/// A snapshot equal to a recorded one is already known. A snapshot that
/// differs from the recorded line for the same game id is a conflict and the
/// recorded line wins. Games for another player or season are dropped.
fn unseen_games<G: SeasonGame>(season: &PlayerSeasonStats, incoming: &[G]) -> Vec<G> {
    let recorded: HashSet<&G> = season.games::<G>().iter().collect();
    let mut taken: HashSet<GameId> = season.games::<G>().iter().map(|g| g.game_id()).collect();
    let mut unseen = Vec::new();
    for game in incoming {
        if game.player_id() != season.player_id() || game.season() != season.season() {
            warn!(
                "skipping {} game {} for player {} season {}: aggregate is player {} season {}",
                G::CATEGORY,
                game.game_id(),
                game.player_id(),
                game.season(),
                season.player_id(),
                season.season()
            );
            continue;
        }
        if recorded.contains(game) {
            continue;
        }
        if !taken.insert(game.game_id()) {
            warn!(
                "skipping conflicting {} line for game {} of player {}: game already logged",
                G::CATEGORY,
                game.game_id(),
                game.player_id()
            );
            continue;
        }
        unseen.push(game.clone());
    }
    unseen
}
