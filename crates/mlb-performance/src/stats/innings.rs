// Innings pitched / played, stored as whole outs.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const OUTS_PER_INNING: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InningsParseError {
    #[error("innings count must be a non-negative number, got `{0}`")]
    NotANumber(String),

    #[error("invalid partial innings in `{0}`: only .0, .1 (1/3) or .2 (2/3) are allowed")]
    InvalidPartial(String),
}

/// A count of innings. Partial innings are whole outs, so the value is held
/// as an out count and stays comparable and hashable.
///
/// Parses both the box-score shorthand (`6.1` is six and one third innings)
/// and the decimal form (`6.333`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InningsCount {
    outs: u32,
}

impl InningsCount {
    pub const ZERO: InningsCount = InningsCount { outs: 0 };

    pub fn from_outs(outs: u32) -> Self {
        InningsCount { outs }
    }

    /// Panics on overflow. Use `checked_new` for untrusted input.
    pub fn new(full_innings: u32, additional_outs: u32) -> Self {
        match Self::checked_new(full_innings, additional_outs) {
            Some(innings) => innings,
            None => panic!("{full_innings}.{additional_outs} innings overflows the out count"),
        }
    }

    /// `None` if the out count does not fit.
    pub fn checked_new(full_innings: u32, additional_outs: u32) -> Option<Self> {
        full_innings
            .checked_mul(OUTS_PER_INNING)?
            .checked_add(additional_outs)
            .map(|outs| InningsCount { outs })
    }

    /// Build from a decimal value such as `5.1` or `5.667`.
    pub fn from_decimal(value: f64) -> Result<Self, InningsParseError> {
        if !value.is_finite() || value < 0.0 {
            return Err(InningsParseError::NotANumber(value.to_string()));
        }
        let full = value.trunc();
        let partial = ((value - full) * 1000.0).round() as u32;
        let extra_outs = match partial {
            0 => 0,
            100 | 333 => 1,
            200 | 667 => 2,
            _ => return Err(InningsParseError::InvalidPartial(value.to_string())),
        };
        InningsCount::checked_new(full as u32, extra_outs)
            .ok_or_else(|| InningsParseError::NotANumber(value.to_string()))
    }

    pub fn outs(&self) -> u32 {
        self.outs
    }

    pub fn full_innings(&self) -> u32 {
        self.outs / OUTS_PER_INNING
    }

    pub fn additional_outs(&self) -> u32 {
        self.outs % OUTS_PER_INNING
    }

    /// Real-number innings for rate stats (6.1 shorthand is 6.333...).
    pub fn as_f64(&self) -> f64 {
        self.outs as f64 / OUTS_PER_INNING as f64
    }
}

impl Add for InningsCount {
    type Output = InningsCount;

    fn add(self, rhs: Self) -> Self::Output {
        InningsCount {
            outs: self.outs.saturating_add(rhs.outs),
        }
    }
}

impl std::iter::Sum for InningsCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(InningsCount::ZERO, Add::add)
    }
}

impl fmt::Display for InningsCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.full_innings(), self.additional_outs())
    }
}

impl FromStr for InningsCount {
    type Err = InningsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let full: u32 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| InningsParseError::NotANumber(s.to_string()))?
        };
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(InningsParseError::NotANumber(s.to_string()));
        }
        let extra_outs = match fraction.trim_end_matches('0') {
            "" => 0,
            "1" | "33" | "333" => 1,
            "2" | "67" | "667" => 2,
            _ => return Err(InningsParseError::InvalidPartial(s.to_string())),
        };
        InningsCount::checked_new(full, extra_outs)
            .ok_or_else(|| InningsParseError::NotANumber(s.to_string()))
    }
}

impl Serialize for InningsCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InningsCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InningsVisitor;

        impl Visitor<'_> for InningsVisitor {
            type Value = InningsCount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an innings count such as 6.1 or \"6.1\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .ok()
                    .and_then(|full| InningsCount::checked_new(full, 0))
                    .ok_or_else(|| E::custom(InningsParseError::NotANumber(v.to_string())))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .ok()
                    .and_then(|full| InningsCount::checked_new(full, 0))
                    .ok_or_else(|| E::custom(InningsParseError::NotANumber(v.to_string())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                InningsCount::from_decimal(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(InningsVisitor)
    }
}
