// Fielding: per-game snapshot at a position, cumulative totals and stat keys.

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    parse_stat_key, per_nine, ratio, GameId, GameSnapshot, InningsCount, PlayerId, SeasonYear,
    StatCategory, StatKey, StatSource, TeamId, UnknownStatError,
};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Defensive position a fielding line was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
}

impl Position {
    /// Parse a box-score abbreviation. Generic pitcher and outfield
    /// designations map to `Pitcher` and `CenterField`.
    pub fn from_abbreviation(s: &str) -> Option<Position> {
        match s.trim().to_uppercase().as_str() {
            "P" | "SP" | "RP" | "1" => Some(Position::Pitcher),
            "C" | "2" => Some(Position::Catcher),
            "1B" | "3" => Some(Position::FirstBase),
            "2B" | "4" => Some(Position::SecondBase),
            "3B" | "5" => Some(Position::ThirdBase),
            "SS" | "6" => Some(Position::ShortStop),
            "LF" | "7" => Some(Position::LeftField),
            "CF" | "OF" | "8" => Some(Position::CenterField),
            "RF" | "9" => Some(Position::RightField),
            "DH" | "10" => Some(Position::DesignatedHitter),
            _ => None,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldingStats {
    pub games_started: u32,
    pub innings_played: InningsCount,
    pub assists: u32,
    pub putouts: u32,
    pub errors: u32,
    pub throwing_errors: u32,
    pub double_plays: u32,
    pub triple_plays: u32,
    pub caught_stealing: u32,
    pub stolen_bases: u32,
    pub passed_balls: u32,
    pub catcher_interferences: u32,
    pub wild_pitches: u32,
    pub pickoffs: u32,
}

impl FieldingStats {
    pub fn from_games<'a, I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a FieldingGame>,
    {
        games.into_iter().fold(FieldingStats::default(), |mut acc, g| {
            acc += g.stats;
            acc
        })
    }

    /// Assists + putouts + errors.
    pub fn total_chances(&self) -> u32 {
        self.assists + self.putouts + self.errors
    }

    /// (A + PO) / TC
    pub fn fielding_percentage(&self) -> f64 {
        ratio(
            (self.assists + self.putouts) as f64,
            self.total_chances() as f64,
        )
    }

    /// 9 * (A + PO) / innings
    pub fn range_factor_per_nine(&self) -> f64 {
        per_nine(self.assists + self.putouts, self.innings_played)
    }

    /// Stolen base success rate of runners while this fielder was on the field.
    pub fn stolen_base_percentage(&self) -> f64 {
        ratio(
            self.stolen_bases as f64,
            (self.stolen_bases + self.caught_stealing) as f64,
        )
    }
}

impl AddAssign for FieldingStats {
    fn add_assign(&mut self, rhs: Self) {
        self.games_started += rhs.games_started;
        self.innings_played = self.innings_played + rhs.innings_played;
        self.assists += rhs.assists;
        self.putouts += rhs.putouts;
        self.errors += rhs.errors;
        self.throwing_errors += rhs.throwing_errors;
        self.double_plays += rhs.double_plays;
        self.triple_plays += rhs.triple_plays;
        self.caught_stealing += rhs.caught_stealing;
        self.stolen_bases += rhs.stolen_bases;
        self.passed_balls += rhs.passed_balls;
        self.catcher_interferences += rhs.catcher_interferences;
        self.wild_pitches += rhs.wild_pitches;
        self.pickoffs += rhs.pickoffs;
    }
}

/// One player's fielding line for one game at one position. A player who
/// moves positions mid-game has one snapshot per position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldingGame {
    pub player_id: PlayerId,
    pub season: SeasonYear,
    pub game_id: GameId,
    pub game_date: NaiveDate,
    pub team_id: TeamId,
    pub position: Position,
    pub stats: FieldingStats,
}

impl GameSnapshot for FieldingGame {
    type Totals = FieldingStats;

    const CATEGORY: StatCategory = StatCategory::Fielding;

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

    fn totals<'a, I>(games: I) -> FieldingStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        FieldingStats::from_games(games)
    }
}

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldingStat {
    GamesStarted,
    InningsPlayed,
    Assists,
    Putouts,
    Errors,
    ThrowingErrors,
    DoublePlays,
    TriplePlays,
    CaughtStealing,
    StolenBases,
    PassedBalls,
    CatcherInterferences,
    WildPitches,
    Pickoffs,
    FieldingPercentage,
    TotalChances,
    RangeFactorPer9,
    StolenBasePercentage,
}

const ALL_FIELDING_STATS: [FieldingStat; 18] = [
    FieldingStat::GamesStarted,
    FieldingStat::InningsPlayed,
    FieldingStat::Assists,
    FieldingStat::Putouts,
    FieldingStat::Errors,
    FieldingStat::ThrowingErrors,
    FieldingStat::DoublePlays,
    FieldingStat::TriplePlays,
    FieldingStat::CaughtStealing,
    FieldingStat::StolenBases,
    FieldingStat::PassedBalls,
    FieldingStat::CatcherInterferences,
    FieldingStat::WildPitches,
    FieldingStat::Pickoffs,
    FieldingStat::FieldingPercentage,
    FieldingStat::TotalChances,
    FieldingStat::RangeFactorPer9,
    FieldingStat::StolenBasePercentage,
];

impl StatKey for FieldingStat {
    const CATEGORY: StatCategory = StatCategory::Fielding;

    fn all() -> &'static [Self] {
        &ALL_FIELDING_STATS
    }

    fn name(&self) -> &'static str {
        match self {
            FieldingStat::GamesStarted => "GamesStarted",
            FieldingStat::InningsPlayed => "InningsPlayed",
            FieldingStat::Assists => "Assists",
            FieldingStat::Putouts => "Putouts",
            FieldingStat::Errors => "Errors",
            FieldingStat::ThrowingErrors => "ThrowingErrors",
            FieldingStat::DoublePlays => "DoublePlays",
            FieldingStat::TriplePlays => "TriplePlays",
            FieldingStat::CaughtStealing => "CaughtStealing",
            FieldingStat::StolenBases => "StolenBases",
            FieldingStat::PassedBalls => "PassedBalls",
            FieldingStat::CatcherInterferences => "CatcherInterferences",
            FieldingStat::WildPitches => "WildPitches",
            FieldingStat::Pickoffs => "Pickoffs",
            FieldingStat::FieldingPercentage => "FieldingPercentage",
            FieldingStat::TotalChances => "TotalChances",
            FieldingStat::RangeFactorPer9 => "RangeFactorPer9",
            FieldingStat::StolenBasePercentage => "StolenBasePercentage",
        }
    }
}

impl fmt::Display for FieldingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldingStat {
    type Err = UnknownStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_stat_key(s)
    }
}

impl StatSource<FieldingStat> for FieldingStats {
    fn stat_value(&self, key: FieldingStat) -> Option<f64> {
        let value = match key {
            FieldingStat::GamesStarted => self.games_started as f64,
            FieldingStat::InningsPlayed => self.innings_played.as_f64(),
            FieldingStat::Assists => self.assists as f64,
            FieldingStat::Putouts => self.putouts as f64,
            FieldingStat::Errors => self.errors as f64,
            FieldingStat::ThrowingErrors => self.throwing_errors as f64,
            FieldingStat::DoublePlays => self.double_plays as f64,
            FieldingStat::TriplePlays => self.triple_plays as f64,
            FieldingStat::CaughtStealing => self.caught_stealing as f64,
            FieldingStat::StolenBases => self.stolen_bases as f64,
            FieldingStat::PassedBalls => self.passed_balls as f64,
            FieldingStat::CatcherInterferences => self.catcher_interferences as f64,
            FieldingStat::WildPitches => self.wild_pitches as f64,
            FieldingStat::Pickoffs => self.pickoffs as f64,
            FieldingStat::FieldingPercentage => self.fielding_percentage(),
            FieldingStat::TotalChances => self.total_chances() as f64,
            FieldingStat::RangeFactorPer9 => self.range_factor_per_nine(),
            FieldingStat::StolenBasePercentage => self.stolen_base_percentage(),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortstop_line() -> FieldingStats {
        FieldingStats {
            games_started: 1,
            innings_played: InningsCount::new(9, 0),
            assists: 5,
            putouts: 2,
            errors: 1,
            double_plays: 1,
            ..Default::default()
        }
    }

    #[test]
    fn derived_rates() {
        let s = shortstop_line();
        assert_eq!(s.total_chances(), 8);
        assert!((s.fielding_percentage() - 0.875).abs() < 1e-9);
        assert!((s.range_factor_per_nine() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn no_chances_means_zero_rates() {
        let s = FieldingStats::default();
        assert_eq!(s.total_chances(), 0);
        assert_eq!(s.fielding_percentage(), 0.0);
        assert_eq!(s.range_factor_per_nine(), 0.0);
    }

    #[test]
    fn position_abbreviations() {
        assert_eq!(Position::from_abbreviation("ss"), Some(Position::ShortStop));
        assert_eq!(Position::from_abbreviation("OF"), Some(Position::CenterField));
        assert_eq!(Position::from_abbreviation("RP"), Some(Position::Pitcher));
        assert_eq!(Position::from_abbreviation("XX"), None);
        assert_eq!(Position::ThirdBase.to_string(), "3B");
    }

    #[test]
    fn totals_span_positions() {
        let game = |id: u32, position: Position| FieldingGame {
            player_id: PlayerId(3),
            season: SeasonYear(2024),
            game_id: GameId(id),
            game_date: NaiveDate::from_ymd_opt(2024, 6, id).unwrap(),
            team_id: TeamId(111),
            position,
            stats: shortstop_line(),
        };
        let games = [game(1, Position::ShortStop), game(2, Position::SecondBase)];
        let totals = FieldingGame::totals(&games);
        assert_eq!(totals.total_chances(), 16);
        assert_eq!(totals.innings_played, InningsCount::new(18, 0));
    }

    #[test]
    fn every_key_resolves_and_round_trips_by_name() {
        let s = shortstop_line();
        for key in FieldingStat::all() {
            assert!(s.stat_value(*key).is_some(), "{key} did not resolve");
            assert_eq!(key.name().parse::<FieldingStat>().unwrap(), *key);
        }
        assert_eq!(s.stat_value(FieldingStat::Errors), Some(1.0));
    }
}
