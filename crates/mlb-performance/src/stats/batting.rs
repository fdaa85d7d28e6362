// Batting: per-game snapshot, cumulative totals and stat keys.

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    parse_stat_key, ratio, GameId, GameSnapshot, PlayerId, SeasonYear, StatCategory, StatKey,
    StatSource, TeamId, UnknownStatError,
};

/// Batting counting stats. Used both for a single game's line and for
/// season-to-date totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattingStats {
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs_batted_in: u32,
    pub base_on_balls: u32,
    pub intentional_walks: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub hit_by_pitches: u32,
    pub sacrifice_bunts: u32,
    pub sacrifice_flies: u32,
    pub number_of_pitches_seen: u32,
    pub left_on_base: u32,
    pub ground_outs: u32,
    pub ground_into_double_plays: u32,
    pub ground_into_triple_plays: u32,
    pub air_outs: u32,
    pub catcher_interferences: u32,
}

impl BattingStats {
    pub fn from_games<'a, I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a BattingGame>,
    {
        games.into_iter().fold(BattingStats::default(), |mut acc, g| {
            acc += g.stats;
            acc
        })
    }

    /// H / AB
    pub fn batting_average(&self) -> f64 {
        ratio(self.hits as f64, self.at_bats as f64)
    }

    /// (H + BB + HBP) / (AB + BB + HBP + SF)
    pub fn on_base_percentage(&self) -> f64 {
        let on_base = self.hits + self.base_on_balls + self.hit_by_pitches;
        let chances =
            self.at_bats + self.base_on_balls + self.hit_by_pitches + self.sacrifice_flies;
        ratio(on_base as f64, chances as f64)
    }

    /// 1B + 2×2B + 3×3B + 4×HR
    pub fn total_bases(&self) -> u32 {
        self.hits + self.doubles + 2 * self.triples + 3 * self.home_runs
    }

    pub fn slugging(&self) -> f64 {
        ratio(self.total_bases() as f64, self.at_bats as f64)
    }

    pub fn on_base_plus_slugging(&self) -> f64 {
        self.on_base_percentage() + self.slugging()
    }

    /// (H - HR) / (AB - K - HR + SF)
    pub fn batting_average_on_balls_in_play(&self) -> f64 {
        let in_play = (self.at_bats + self.sacrifice_flies)
            .saturating_sub(self.strikeouts + self.home_runs);
        ratio(self.hits.saturating_sub(self.home_runs) as f64, in_play as f64)
    }

    /// SB / (SB + CS)
    pub fn stolen_base_percentage(&self) -> f64 {
        ratio(
            self.stolen_bases as f64,
            (self.stolen_bases + self.caught_stealing) as f64,
        )
    }
}

impl AddAssign for BattingStats {
    fn add_assign(&mut self, rhs: Self) {
        self.plate_appearances += rhs.plate_appearances;
        self.at_bats += rhs.at_bats;
        self.runs += rhs.runs;
        self.hits += rhs.hits;
        self.doubles += rhs.doubles;
        self.triples += rhs.triples;
        self.home_runs += rhs.home_runs;
        self.runs_batted_in += rhs.runs_batted_in;
        self.base_on_balls += rhs.base_on_balls;
        self.intentional_walks += rhs.intentional_walks;
        self.strikeouts += rhs.strikeouts;
        self.stolen_bases += rhs.stolen_bases;
        self.caught_stealing += rhs.caught_stealing;
        self.hit_by_pitches += rhs.hit_by_pitches;
        self.sacrifice_bunts += rhs.sacrifice_bunts;
        self.sacrifice_flies += rhs.sacrifice_flies;
        self.number_of_pitches_seen += rhs.number_of_pitches_seen;
        self.left_on_base += rhs.left_on_base;
        self.ground_outs += rhs.ground_outs;
        self.ground_into_double_plays += rhs.ground_into_double_plays;
        self.ground_into_triple_plays += rhs.ground_into_triple_plays;
        self.air_outs += rhs.air_outs;
        self.catcher_interferences += rhs.catcher_interferences;
    }
}

/// One player's batting line for one game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattingGame {
    pub player_id: PlayerId,
    pub season: SeasonYear,
    pub game_id: GameId,
    pub game_date: NaiveDate,
    pub team_id: TeamId,
    pub stats: BattingStats,
}

impl GameSnapshot for BattingGame {
    type Totals = BattingStats;

    const CATEGORY: StatCategory = StatCategory::Batting;

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

    fn totals<'a, I>(games: I) -> BattingStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        BattingStats::from_games(games)
    }
}

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattingStat {
    PlateAppearances,
    AtBats,
    Runs,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    RunsBattedIn,
    BaseOnBalls,
    IntentionalWalks,
    Strikeouts,
    StolenBases,
    CaughtStealing,
    HitByPitches,
    SacrificeBunts,
    SacrificeFlies,
    NumberOfPitchesSeen,
    LeftOnBase,
    GroundOuts,
    GroundIntoDoublePlays,
    GroundIntoTriplePlays,
    AirOuts,
    CatcherInterferences,
    BattingAverage,
    OnBasePercentage,
    BattingAverageOnBallsInPlay,
    TotalBases,
    Slugging,
    OnBasePlusSlugging,
    StolenBasePercentage,
}

const ALL_BATTING_STATS: [BattingStat; 30] = [
    BattingStat::PlateAppearances,
    BattingStat::AtBats,
    BattingStat::Runs,
    BattingStat::Hits,
    BattingStat::Doubles,
    BattingStat::Triples,
    BattingStat::HomeRuns,
    BattingStat::RunsBattedIn,
    BattingStat::BaseOnBalls,
    BattingStat::IntentionalWalks,
    BattingStat::Strikeouts,
    BattingStat::StolenBases,
    BattingStat::CaughtStealing,
    BattingStat::HitByPitches,
    BattingStat::SacrificeBunts,
    BattingStat::SacrificeFlies,
    BattingStat::NumberOfPitchesSeen,
    BattingStat::LeftOnBase,
    BattingStat::GroundOuts,
    BattingStat::GroundIntoDoublePlays,
    BattingStat::GroundIntoTriplePlays,
    BattingStat::AirOuts,
    BattingStat::CatcherInterferences,
    BattingStat::BattingAverage,
    BattingStat::OnBasePercentage,
    BattingStat::BattingAverageOnBallsInPlay,
    BattingStat::TotalBases,
    BattingStat::Slugging,
    BattingStat::OnBasePlusSlugging,
    BattingStat::StolenBasePercentage,
];

impl StatKey for BattingStat {
    const CATEGORY: StatCategory = StatCategory::Batting;

    fn all() -> &'static [Self] {
        &ALL_BATTING_STATS
    }

    fn name(&self) -> &'static str {
        match self {
            BattingStat::PlateAppearances => "PlateAppearances",
            BattingStat::AtBats => "AtBats",
            BattingStat::Runs => "Runs",
            BattingStat::Hits => "Hits",
            BattingStat::Doubles => "Doubles",
            BattingStat::Triples => "Triples",
            BattingStat::HomeRuns => "HomeRuns",
            BattingStat::RunsBattedIn => "RunsBattedIn",
            BattingStat::BaseOnBalls => "BaseOnBalls",
            BattingStat::IntentionalWalks => "IntentionalWalks",
            BattingStat::Strikeouts => "Strikeouts",
            BattingStat::StolenBases => "StolenBases",
            BattingStat::CaughtStealing => "CaughtStealing",
            BattingStat::HitByPitches => "HitByPitches",
            BattingStat::SacrificeBunts => "SacrificeBunts",
            BattingStat::SacrificeFlies => "SacrificeFlies",
            BattingStat::NumberOfPitchesSeen => "NumberOfPitchesSeen",
            BattingStat::LeftOnBase => "LeftOnBase",
            BattingStat::GroundOuts => "GroundOuts",
            BattingStat::GroundIntoDoublePlays => "GroundIntoDoublePlays",
            BattingStat::GroundIntoTriplePlays => "GroundIntoTriplePlays",
            BattingStat::AirOuts => "AirOuts",
            BattingStat::CatcherInterferences => "CatcherInterferences",
            BattingStat::BattingAverage => "BattingAverage",
            BattingStat::OnBasePercentage => "OnBasePercentage",
            BattingStat::BattingAverageOnBallsInPlay => "BattingAverageOnBallsInPlay",
            BattingStat::TotalBases => "TotalBases",
            BattingStat::Slugging => "Slugging",
            BattingStat::OnBasePlusSlugging => "OnBasePlusSlugging",
            BattingStat::StolenBasePercentage => "StolenBasePercentage",
        }
    }
}

impl fmt::Display for BattingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BattingStat {
    type Err = UnknownStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_stat_key(s)
    }
}

impl StatSource<BattingStat> for BattingStats {
    fn stat_value(&self, key: BattingStat) -> Option<f64> {
        let value = match key {
            BattingStat::PlateAppearances => self.plate_appearances as f64,
            BattingStat::AtBats => self.at_bats as f64,
            BattingStat::Runs => self.runs as f64,
            BattingStat::Hits => self.hits as f64,
            BattingStat::Doubles => self.doubles as f64,
            BattingStat::Triples => self.triples as f64,
            BattingStat::HomeRuns => self.home_runs as f64,
            BattingStat::RunsBattedIn => self.runs_batted_in as f64,
            BattingStat::BaseOnBalls => self.base_on_balls as f64,
            BattingStat::IntentionalWalks => self.intentional_walks as f64,
            BattingStat::Strikeouts => self.strikeouts as f64,
            BattingStat::StolenBases => self.stolen_bases as f64,
            BattingStat::CaughtStealing => self.caught_stealing as f64,
            BattingStat::HitByPitches => self.hit_by_pitches as f64,
            BattingStat::SacrificeBunts => self.sacrifice_bunts as f64,
            BattingStat::SacrificeFlies => self.sacrifice_flies as f64,
            BattingStat::NumberOfPitchesSeen => self.number_of_pitches_seen as f64,
            BattingStat::LeftOnBase => self.left_on_base as f64,
            BattingStat::GroundOuts => self.ground_outs as f64,
            BattingStat::GroundIntoDoublePlays => self.ground_into_double_plays as f64,
            BattingStat::GroundIntoTriplePlays => self.ground_into_triple_plays as f64,
            BattingStat::AirOuts => self.air_outs as f64,
            BattingStat::CatcherInterferences => self.catcher_interferences as f64,
            BattingStat::BattingAverage => self.batting_average(),
            BattingStat::OnBasePercentage => self.on_base_percentage(),
            BattingStat::BattingAverageOnBallsInPlay => self.batting_average_on_balls_in_play(),
            BattingStat::TotalBases => self.total_bases() as f64,
            BattingStat::Slugging => self.slugging(),
            BattingStat::OnBasePlusSlugging => self.on_base_plus_slugging(),
            BattingStat::StolenBasePercentage => self.stolen_base_percentage(),
        };
        Some(value)
    }
}
