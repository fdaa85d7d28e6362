// Per-game stat snapshots, cumulative season totals and the stat keys that
// normalization criteria refer to.

pub mod batting;
pub mod fielding;
pub mod innings;
pub mod pitching;

use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use batting::{BattingGame, BattingStat, BattingStats};
pub use fielding::{FieldingGame, FieldingStat, FieldingStats, Position};
pub use innings::{InningsCount, InningsParseError};
pub use pitching::{PitchingGame, PitchingStat, PitchingStats};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// MLB player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

/// MLB game identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

/// MLB team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

/// The calendar year of a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonYear(pub u16);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SeasonYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Stat categories
// ---------------------------------------------------------------------------

/// The three independent stat categories tracked for every player season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Batting,
    Pitching,
    Fielding,
}

impl StatCategory {
    pub const ALL: [StatCategory; 3] = [
        StatCategory::Batting,
        StatCategory::Pitching,
        StatCategory::Fielding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::Batting => "batting",
            StatCategory::Pitching => "pitching",
            StatCategory::Fielding => "fielding",
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stat keys and lookup
// ---------------------------------------------------------------------------

/// An enumerated stat belonging to exactly one category.
pub trait StatKey: Copy + Eq + Hash + fmt::Debug + 'static {
    /// The category whose stat set this key is a member of.
    const CATEGORY: StatCategory;

    /// Every key of the category, in declaration order.
    fn all() -> &'static [Self];

    /// Canonical name used in configuration files.
    fn name(&self) -> &'static str;

    /// Look up a key by its canonical name (case-insensitive).
    fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// A stats view that can resolve the raw value of a category's stat keys.
///
/// The concrete season totals resolve every key. Narrower views may return
/// `None`, which the scorer reports as a stat lookup failure.
pub trait StatSource<K: StatKey> {
    fn stat_value(&self, key: K) -> Option<f64>;
}

/// Returned by `FromStr` on the stat key enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is not a {category} stat")]
pub struct UnknownStatError {
    pub category: StatCategory,
    pub name: String,
}

pub(crate) fn parse_stat_key<K: StatKey>(name: &str) -> Result<K, UnknownStatError> {
    K::from_name(name).ok_or_else(|| UnknownStatError {
        category: K::CATEGORY,
        name: name.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Game snapshots
// ---------------------------------------------------------------------------

/// A single game's stat line for one player. Equality is structural over
/// every field, which is what duplicate detection relies on.
pub trait GameSnapshot: Clone + Eq + Hash + fmt::Debug {
    /// Cumulative totals built from a run of these snapshots.
    type Totals;

    const CATEGORY: StatCategory;

    fn player_id(&self) -> PlayerId;
    fn season(&self) -> SeasonYear;
    fn game_id(&self) -> GameId;
    fn game_date(&self) -> NaiveDate;

    fn totals<'a, I>(games: I) -> Self::Totals
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a;
}

/// Divide two stat values, yielding 0.0 when the denominator is zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

/// A per-nine-innings rate.
pub(crate) fn per_nine(count: u32, innings: InningsCount) -> f64 {
    ratio(9.0 * count as f64, innings.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert!((ratio(1.0, 4.0) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn per_nine_uses_real_innings() {
        // 2 earned runs over 4 2/3 innings
        let ip = InningsCount::from_outs(14);
        let era = per_nine(2, ip);
        assert!((era - 3.857142857).abs() < 1e-6);
    }

    #[test]
    fn stat_key_lookup_is_case_insensitive() {
        assert_eq!(BattingStat::from_name("homeruns"), Some(BattingStat::HomeRuns));
        assert_eq!(FieldingStat::from_name(" Errors "), Some(FieldingStat::Errors));
        assert_eq!(FieldingStat::from_name("HomeRuns"), None);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&StatCategory::Pitching).unwrap();
        assert_eq!(json, "\"pitching\"");
    }
}
