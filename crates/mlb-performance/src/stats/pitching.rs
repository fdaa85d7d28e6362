// Pitching: per-game snapshot, cumulative totals and stat keys.

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    parse_stat_key, per_nine, ratio, GameId, GameSnapshot, InningsCount, PlayerId, SeasonYear,
    StatCategory, StatKey, StatSource, TeamId, UnknownStatError,
};

/// Minimum innings for a start to count as a quality start.
const QUALITY_START_MIN_OUTS: u32 = 18;
/// Maximum earned runs allowed in a quality start.
const QUALITY_START_MAX_EARNED_RUNS: u32 = 3;

/// Pitching counting stats. In a single game's line the decision fields
/// (`wins`, `saves`, ...) are 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchingStats {
    pub wins: u32,
    pub losses: u32,
    pub games_started: u32,
    pub games_finished: u32,
    pub complete_games: u32,
    pub shutouts: u32,
    pub holds: u32,
    pub saves: u32,
    pub blown_saves: u32,
    pub save_opportunities: u32,
    pub quality_starts: u32,
    pub innings_pitched: InningsCount,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub strikeouts: u32,
    pub base_on_balls: u32,
    pub intentional_walks: u32,
    pub hit_batsmen: u32,
    pub outs: u32,
    pub ground_outs: u32,
    pub air_outs: u32,
    pub ground_into_double_plays: u32,
    pub number_of_pitches: u32,
    pub strikes: u32,
    pub wild_pitches: u32,
    pub balks: u32,
    pub batters_faced: u32,
    pub at_bats: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub pickoffs: u32,
    pub inherited_runners: u32,
    pub inherited_runners_scored: u32,
    pub catcher_interferences: u32,
    pub sacrifice_bunts: u32,
    pub sacrifice_flies: u32,
}

impl PitchingStats {
    pub fn from_games<'a, I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a PitchingGame>,
    {
        games.into_iter().fold(PitchingStats::default(), |mut acc, g| {
            acc += g.stats;
            acc
        })
    }

    /// A start of at least six innings allowing three or fewer earned runs.
    /// Meaningful for a single game's line.
    pub fn is_quality_start(&self) -> bool {
        self.games_started > 0
            && self.innings_pitched.outs() >= QUALITY_START_MIN_OUTS
            && self.earned_runs <= QUALITY_START_MAX_EARNED_RUNS
    }

    pub fn earned_run_average(&self) -> f64 {
        per_nine(self.earned_runs, self.innings_pitched)
    }

    /// H / (BF - BB - HBP - SH - SF - CI)
    pub fn opponents_batting_average(&self) -> f64 {
        let official_at_bats = self.batters_faced.saturating_sub(
            self.base_on_balls
                + self.hit_batsmen
                + self.sacrifice_bunts
                + self.sacrifice_flies
                + self.catcher_interferences,
        );
        ratio(self.hits as f64, official_at_bats as f64)
    }

    /// (H + BB + HBP) / (AB + BB + HBP + SF)
    pub fn opponents_on_base_percentage(&self) -> f64 {
        let on_base = self.hits + self.base_on_balls + self.hit_batsmen;
        let chances = self.at_bats + self.base_on_balls + self.hit_batsmen + self.sacrifice_flies;
        ratio(on_base as f64, chances as f64)
    }

    pub fn total_bases(&self) -> u32 {
        self.hits + self.doubles + 2 * self.triples + 3 * self.home_runs
    }

    pub fn slugging(&self) -> f64 {
        ratio(self.total_bases() as f64, self.at_bats as f64)
    }

    pub fn opponents_on_base_plus_slugging(&self) -> f64 {
        self.opponents_on_base_percentage() + self.slugging()
    }

    pub fn pitches_per_inning(&self) -> f64 {
        ratio(self.number_of_pitches as f64, self.innings_pitched.as_f64())
    }

    pub fn strike_percentage(&self) -> f64 {
        ratio(self.strikes as f64, self.number_of_pitches as f64)
    }

    pub fn walks_plus_hits_per_inning_pitched(&self) -> f64 {
        ratio(
            (self.base_on_balls + self.hits) as f64,
            self.innings_pitched.as_f64(),
        )
    }

    pub fn strikeout_to_walk_ratio(&self) -> f64 {
        ratio(self.strikeouts as f64, self.base_on_balls as f64)
    }

    pub fn hits_per_nine(&self) -> f64 {
        per_nine(self.hits, self.innings_pitched)
    }

    pub fn strikeouts_per_nine(&self) -> f64 {
        per_nine(self.strikeouts, self.innings_pitched)
    }

    pub fn base_on_balls_per_nine(&self) -> f64 {
        per_nine(self.base_on_balls, self.innings_pitched)
    }

    pub fn runs_scored_per_nine(&self) -> f64 {
        per_nine(self.runs, self.innings_pitched)
    }

    pub fn home_runs_per_nine(&self) -> f64 {
        per_nine(self.home_runs, self.innings_pitched)
    }

    /// Stolen base success rate of opposing runners.
    pub fn stolen_base_percentage(&self) -> f64 {
        ratio(
            self.stolen_bases as f64,
            (self.stolen_bases + self.caught_stealing) as f64,
        )
    }
}

impl AddAssign for PitchingStats {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.games_started += rhs.games_started;
        self.games_finished += rhs.games_finished;
        self.complete_games += rhs.complete_games;
        self.shutouts += rhs.shutouts;
        self.holds += rhs.holds;
        self.saves += rhs.saves;
        self.blown_saves += rhs.blown_saves;
        self.save_opportunities += rhs.save_opportunities;
        self.quality_starts += rhs.quality_starts;
        self.innings_pitched = self.innings_pitched + rhs.innings_pitched;
        self.hits += rhs.hits;
        self.doubles += rhs.doubles;
        self.triples += rhs.triples;
        self.home_runs += rhs.home_runs;
        self.runs += rhs.runs;
        self.earned_runs += rhs.earned_runs;
        self.strikeouts += rhs.strikeouts;
        self.base_on_balls += rhs.base_on_balls;
        self.intentional_walks += rhs.intentional_walks;
        self.hit_batsmen += rhs.hit_batsmen;
        self.outs += rhs.outs;
        self.ground_outs += rhs.ground_outs;
        self.air_outs += rhs.air_outs;
        self.ground_into_double_plays += rhs.ground_into_double_plays;
        self.number_of_pitches += rhs.number_of_pitches;
        self.strikes += rhs.strikes;
        self.wild_pitches += rhs.wild_pitches;
        self.balks += rhs.balks;
        self.batters_faced += rhs.batters_faced;
        self.at_bats += rhs.at_bats;
        self.stolen_bases += rhs.stolen_bases;
        self.caught_stealing += rhs.caught_stealing;
        self.pickoffs += rhs.pickoffs;
        self.inherited_runners += rhs.inherited_runners;
        self.inherited_runners_scored += rhs.inherited_runners_scored;
        self.catcher_interferences += rhs.catcher_interferences;
        self.sacrifice_bunts += rhs.sacrifice_bunts;
        self.sacrifice_flies += rhs.sacrifice_flies;
    }
}

/// One player's pitching line for one game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchingGame {
    pub player_id: PlayerId,
    pub season: SeasonYear,
    pub game_id: GameId,
    pub game_date: NaiveDate,
    pub team_id: TeamId,
    pub stats: PitchingStats,
}

impl GameSnapshot for PitchingGame {
    type Totals = PitchingStats;

    const CATEGORY: StatCategory = StatCategory::Pitching;

    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn season(&self) -> SeasonYear {
        self.season
    }

    fn game_id(&self) -> GameId {
        self.game_id
    }

    fn game_date(&self) -> NaiveDate {
        self.game_date
    }

    fn totals<'a, I>(games: I) -> PitchingStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        PitchingStats::from_games(games)
    }
}

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchingStat {
    Wins,
    Losses,
    GamesStarted,
    GamesFinished,
    CompleteGames,
    Shutouts,
    Holds,
    Saves,
    BlownSaves,
    SaveOpportunities,
    QualityStarts,
    InningsPitched,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    Runs,
    EarnedRuns,
    Strikeouts,
    BaseOnBalls,
    IntentionalWalks,
    HitBatsmen,
    Outs,
    GroundOuts,
    AirOuts,
    GroundIntoDoublePlays,
    NumberOfPitches,
    Strikes,
    WildPitches,
    Balks,
    BattersFaced,
    AtBats,
    StolenBases,
    CaughtStealing,
    Pickoffs,
    InheritedRunners,
    InheritedRunnersScored,
    CatcherInterferences,
    SacrificeBunts,
    SacrificeFlies,
    EarnedRunAverage,
    OpponentsBattingAverage,
    OpponentsOnBasePercentage,
    TotalBases,
    Slugging,
    OpponentsOnBasePlusSlugging,
    PitchesPerInning,
    StrikePercentage,
    WalksPlusHitsPerInningPitched,
    StrikeoutToWalkRatio,
    HitsPer9,
    StrikeoutsPer9,
    BaseOnBallsPer9,
    RunsScoredPer9,
    HomeRunsPer9,
    StolenBasePercentage,
}

const ALL_PITCHING_STATS: [PitchingStat; 56] = [
    PitchingStat::Wins,
    PitchingStat::Losses,
    PitchingStat::GamesStarted,
    PitchingStat::GamesFinished,
    PitchingStat::CompleteGames,
    PitchingStat::Shutouts,
    PitchingStat::Holds,
    PitchingStat::Saves,
    PitchingStat::BlownSaves,
    PitchingStat::SaveOpportunities,
    PitchingStat::QualityStarts,
    PitchingStat::InningsPitched,
    PitchingStat::Hits,
    PitchingStat::Doubles,
    PitchingStat::Triples,
    PitchingStat::HomeRuns,
    PitchingStat::Runs,
    PitchingStat::EarnedRuns,
    PitchingStat::Strikeouts,
    PitchingStat::BaseOnBalls,
    PitchingStat::IntentionalWalks,
    PitchingStat::HitBatsmen,
    PitchingStat::Outs,
    PitchingStat::GroundOuts,
    PitchingStat::AirOuts,
    PitchingStat::GroundIntoDoublePlays,
    PitchingStat::NumberOfPitches,
    PitchingStat::Strikes,
    PitchingStat::WildPitches,
    PitchingStat::Balks,
    PitchingStat::BattersFaced,
    PitchingStat::AtBats,
    PitchingStat::StolenBases,
    PitchingStat::CaughtStealing,
    PitchingStat::Pickoffs,
    PitchingStat::InheritedRunners,
    PitchingStat::InheritedRunnersScored,
    PitchingStat::CatcherInterferences,
    PitchingStat::SacrificeBunts,
    PitchingStat::SacrificeFlies,
    PitchingStat::EarnedRunAverage,
    PitchingStat::OpponentsBattingAverage,
    PitchingStat::OpponentsOnBasePercentage,
    PitchingStat::TotalBases,
    PitchingStat::Slugging,
    PitchingStat::OpponentsOnBasePlusSlugging,
    PitchingStat::PitchesPerInning,
    PitchingStat::StrikePercentage,
    PitchingStat::WalksPlusHitsPerInningPitched,
    PitchingStat::StrikeoutToWalkRatio,
    PitchingStat::HitsPer9,
    PitchingStat::StrikeoutsPer9,
    PitchingStat::BaseOnBallsPer9,
    PitchingStat::RunsScoredPer9,
    PitchingStat::HomeRunsPer9,
    PitchingStat::StolenBasePercentage,
];

impl StatKey for PitchingStat {
    const CATEGORY: StatCategory = StatCategory::Pitching;

    fn all() -> &'static [Self] {
        &ALL_PITCHING_STATS
    }

    fn name(&self) -> &'static str {
        match self {
            PitchingStat::Wins => "Wins",
            PitchingStat::Losses => "Losses",
            PitchingStat::GamesStarted => "GamesStarted",
            PitchingStat::GamesFinished => "GamesFinished",
            PitchingStat::CompleteGames => "CompleteGames",
            PitchingStat::Shutouts => "Shutouts",
            PitchingStat::Holds => "Holds",
            PitchingStat::Saves => "Saves",
            PitchingStat::BlownSaves => "BlownSaves",
            PitchingStat::SaveOpportunities => "SaveOpportunities",
            PitchingStat::QualityStarts => "QualityStarts",
            PitchingStat::InningsPitched => "InningsPitched",
            PitchingStat::Hits => "Hits",
            PitchingStat::Doubles => "Doubles",
            PitchingStat::Triples => "Triples",
            PitchingStat::HomeRuns => "HomeRuns",
            PitchingStat::Runs => "Runs",
            PitchingStat::EarnedRuns => "EarnedRuns",
            PitchingStat::Strikeouts => "Strikeouts",
            PitchingStat::BaseOnBalls => "BaseOnBalls",
            PitchingStat::IntentionalWalks => "IntentionalWalks",
            PitchingStat::HitBatsmen => "HitBatsmen",
            PitchingStat::Outs => "Outs",
            PitchingStat::GroundOuts => "GroundOuts",
            PitchingStat::AirOuts => "AirOuts",
            PitchingStat::GroundIntoDoublePlays => "GroundIntoDoublePlays",
            PitchingStat::NumberOfPitches => "NumberOfPitches",
            PitchingStat::Strikes => "Strikes",
            PitchingStat::WildPitches => "WildPitches",
            PitchingStat::Balks => "Balks",
            PitchingStat::BattersFaced => "BattersFaced",
            PitchingStat::AtBats => "AtBats",
            PitchingStat::StolenBases => "StolenBases",
            PitchingStat::CaughtStealing => "CaughtStealing",
            PitchingStat::Pickoffs => "Pickoffs",
            PitchingStat::InheritedRunners => "InheritedRunners",
            PitchingStat::InheritedRunnersScored => "InheritedRunnersScored",
            PitchingStat::CatcherInterferences => "CatcherInterferences",
            PitchingStat::SacrificeBunts => "SacrificeBunts",
            PitchingStat::SacrificeFlies => "SacrificeFlies",
            PitchingStat::EarnedRunAverage => "EarnedRunAverage",
            PitchingStat::OpponentsBattingAverage => "OpponentsBattingAverage",
            PitchingStat::OpponentsOnBasePercentage => "OpponentsOnBasePercentage",
            PitchingStat::TotalBases => "TotalBases",
            PitchingStat::Slugging => "Slugging",
            PitchingStat::OpponentsOnBasePlusSlugging => "OpponentsOnBasePlusSlugging",
            PitchingStat::PitchesPerInning => "PitchesPerInning",
            PitchingStat::StrikePercentage => "StrikePercentage",
            PitchingStat::WalksPlusHitsPerInningPitched => "WalksPlusHitsPerInningPitched",
            PitchingStat::StrikeoutToWalkRatio => "StrikeoutToWalkRatio",
            PitchingStat::HitsPer9 => "HitsPer9",
            PitchingStat::StrikeoutsPer9 => "StrikeoutsPer9",
            PitchingStat::BaseOnBallsPer9 => "BaseOnBallsPer9",
            PitchingStat::RunsScoredPer9 => "RunsScoredPer9",
            PitchingStat::HomeRunsPer9 => "HomeRunsPer9",
            PitchingStat::StolenBasePercentage => "StolenBasePercentage",
        }
    }
}

impl fmt::Display for PitchingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchingStat {
    type Err = UnknownStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_stat_key(s)
    }
}

impl StatSource<PitchingStat> for PitchingStats {
    fn stat_value(&self, key: PitchingStat) -> Option<f64> {
        let value = match key {
            PitchingStat::Wins => self.wins as f64,
            PitchingStat::Losses => self.losses as f64,
            PitchingStat::GamesStarted => self.games_started as f64,
            PitchingStat::GamesFinished => self.games_finished as f64,
            PitchingStat::CompleteGames => self.complete_games as f64,
            PitchingStat::Shutouts => self.shutouts as f64,
            PitchingStat::Holds => self.holds as f64,
            PitchingStat::Saves => self.saves as f64,
            PitchingStat::BlownSaves => self.blown_saves as f64,
            PitchingStat::SaveOpportunities => self.save_opportunities as f64,
            PitchingStat::QualityStarts => self.quality_starts as f64,
            PitchingStat::InningsPitched => self.innings_pitched.as_f64(),
            PitchingStat::Hits => self.hits as f64,
            PitchingStat::Doubles => self.doubles as f64,
            PitchingStat::Triples => self.triples as f64,
            PitchingStat::HomeRuns => self.home_runs as f64,
            PitchingStat::Runs => self.runs as f64,
            PitchingStat::EarnedRuns => self.earned_runs as f64,
            PitchingStat::Strikeouts => self.strikeouts as f64,
            PitchingStat::BaseOnBalls => self.base_on_balls as f64,
            PitchingStat::IntentionalWalks => self.intentional_walks as f64,
            PitchingStat::HitBatsmen => self.hit_batsmen as f64,
            PitchingStat::Outs => self.outs as f64,
            PitchingStat::GroundOuts => self.ground_outs as f64,
            PitchingStat::AirOuts => self.air_outs as f64,
            PitchingStat::GroundIntoDoublePlays => self.ground_into_double_plays as f64,
            PitchingStat::NumberOfPitches => self.number_of_pitches as f64,
            PitchingStat::Strikes => self.strikes as f64,
            PitchingStat::WildPitches => self.wild_pitches as f64,
            PitchingStat::Balks => self.balks as f64,
            PitchingStat::BattersFaced => self.batters_faced as f64,
            PitchingStat::AtBats => self.at_bats as f64,
            PitchingStat::StolenBases => self.stolen_bases as f64,
            PitchingStat::CaughtStealing => self.caught_stealing as f64,
            PitchingStat::Pickoffs => self.pickoffs as f64,
            PitchingStat::InheritedRunners => self.inherited_runners as f64,
            PitchingStat::InheritedRunnersScored => self.inherited_runners_scored as f64,
            PitchingStat::CatcherInterferences => self.catcher_interferences as f64,
            PitchingStat::SacrificeBunts => self.sacrifice_bunts as f64,
            PitchingStat::SacrificeFlies => self.sacrifice_flies as f64,
            PitchingStat::EarnedRunAverage => self.earned_run_average(),
            PitchingStat::OpponentsBattingAverage => self.opponents_batting_average(),
            PitchingStat::OpponentsOnBasePercentage => self.opponents_on_base_percentage(),
            PitchingStat::TotalBases => self.total_bases() as f64,
            PitchingStat::Slugging => self.slugging(),
            PitchingStat::OpponentsOnBasePlusSlugging => self.opponents_on_base_plus_slugging(),
            PitchingStat::PitchesPerInning => self.pitches_per_inning(),
            PitchingStat::StrikePercentage => self.strike_percentage(),
            PitchingStat::WalksPlusHitsPerInningPitched => self.walks_plus_hits_per_inning_pitched(),
            PitchingStat::StrikeoutToWalkRatio => self.strikeout_to_walk_ratio(),
            PitchingStat::HitsPer9 => self.hits_per_nine(),
            PitchingStat::StrikeoutsPer9 => self.strikeouts_per_nine(),
            PitchingStat::BaseOnBallsPer9 => self.base_on_balls_per_nine(),
            PitchingStat::RunsScoredPer9 => self.runs_scored_per_nine(),
            PitchingStat::HomeRunsPer9 => self.home_runs_per_nine(),
            PitchingStat::StolenBasePercentage => self.stolen_base_percentage(),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> PitchingStats {
        PitchingStats {
            wins: 1,
            games_started: 1,
            innings_pitched: InningsCount::new(6, 0),
            hits: 5,
            doubles: 1,
            home_runs: 1,
            runs: 3,
            earned_runs: 2,
            strikeouts: 8,
            base_on_balls: 2,
            hit_batsmen: 1,
            number_of_pitches: 96,
            strikes: 60,
            batters_faced: 25,
            at_bats: 22,
            ..Default::default()
        }
    }

    #[test]
    fn derived_rates() {
        let s = start();
        assert!((s.earned_run_average() - 3.0).abs() < 1e-9);
        assert!((s.walks_plus_hits_per_inning_pitched() - 7.0 / 6.0).abs() < 1e-9);
        assert!((s.strikeouts_per_nine() - 12.0).abs() < 1e-9);
        assert!((s.strikeout_to_walk_ratio() - 4.0).abs() < 1e-9);
        assert!((s.pitches_per_inning() - 16.0).abs() < 1e-9);
        assert!((s.strike_percentage() - 0.625).abs() < 1e-9);
        // 5 / (25 - 2 - 1)
        assert!((s.opponents_batting_average() - 5.0 / 22.0).abs() < 1e-9);
        // 5 + 1 + 3
        assert_eq!(s.total_bases(), 9);
    }

    #[test]
    fn quality_start_needs_six_innings_and_three_or_fewer_earned_runs() {
        assert!(start().is_quality_start());

        let short = PitchingStats {
            innings_pitched: InningsCount::new(5, 2),
            ..start()
        };
        assert!(!short.is_quality_start());

        let shelled = PitchingStats {
            earned_runs: 4,
            ..start()
        };
        assert!(!shelled.is_quality_start());

        let relief = PitchingStats {
            games_started: 0,
            ..start()
        };
        assert!(!relief.is_quality_start());
    }

    #[test]
    fn zero_innings_rates_are_zero() {
        let s = PitchingStats::default();
        assert_eq!(s.earned_run_average(), 0.0);
        assert_eq!(s.walks_plus_hits_per_inning_pitched(), 0.0);
        assert_eq!(s.opponents_batting_average(), 0.0);
    }

    #[test]
    fn totals_carry_partial_innings() {
        let game = |id: u32, innings: InningsCount| PitchingGame {
            player_id: PlayerId(7),
            season: SeasonYear(2024),
            game_id: GameId(id),
            game_date: NaiveDate::from_ymd_opt(2024, 5, id).unwrap(),
            team_id: TeamId(121),
            stats: PitchingStats {
                innings_pitched: innings,
                earned_runs: 1,
                ..Default::default()
            },
        };
        let games = [game(1, InningsCount::new(1, 1)), game(2, InningsCount::new(0, 2))];
        let totals = PitchingGame::totals(&games);
        assert_eq!(totals.innings_pitched, InningsCount::new(2, 0));
        assert!((totals.earned_run_average() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn every_key_resolves_and_round_trips_by_name() {
        let s = start();
        for key in PitchingStat::all() {
            assert!(s.stat_value(*key).is_some(), "{key} did not resolve");
            assert_eq!(key.name().parse::<PitchingStat>().unwrap(), *key);
        }
        assert_eq!(s.stat_value(PitchingStat::InningsPitched), Some(6.0));
    }
}
