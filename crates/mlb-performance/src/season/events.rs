// Domain events raised by a season aggregate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::PerformanceScore;
use crate::stats::{GameId, PlayerId, SeasonYear, StatCategory};

/// Raised by `PlayerSeasonStats` and held until the caller drains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeasonEvent {
    GameLogged {
        player_id: PlayerId,
        season: SeasonYear,
        category: StatCategory,
        game_id: GameId,
        date: NaiveDate,
    },
    /// Raised whether or not participation was met.
    PerformanceAssessed {
        player_id: PlayerId,
        season: SeasonYear,
        category: StatCategory,
        date: NaiveDate,
        score: PerformanceScore,
        participation_met: bool,
    },
    /// The new score beat the previous one by at least the change threshold.
    PerformanceImproved {
        player_id: PlayerId,
        season: SeasonYear,
        category: StatCategory,
        date: NaiveDate,
        previous: PerformanceScore,
        current: PerformanceScore,
        percentage_change: f64,
    },
    PerformanceDeclined {
        player_id: PlayerId,
        season: SeasonYear,
        category: StatCategory,
        date: NaiveDate,
        previous: PerformanceScore,
        current: PerformanceScore,
        percentage_change: f64,
    },
}

impl SeasonEvent {
    pub fn category(&self) -> StatCategory {
        match self {
            SeasonEvent::GameLogged { category, .. }
            | SeasonEvent::PerformanceAssessed { category, .. }
            | SeasonEvent::PerformanceImproved { category, .. }
            | SeasonEvent::PerformanceDeclined { category, .. } => *category,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            SeasonEvent::GameLogged { date, .. }
            | SeasonEvent::PerformanceAssessed { date, .. }
            | SeasonEvent::PerformanceImproved { date, .. }
            | SeasonEvent::PerformanceDeclined { date, .. } => *date,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        match self {
            SeasonEvent::GameLogged { player_id, .. }
            | SeasonEvent::PerformanceAssessed { player_id, .. }
            | SeasonEvent::PerformanceImproved { player_id, .. }
            | SeasonEvent::PerformanceDeclined { player_id, .. } => *player_id,
        }
    }

    pub fn is_assessment(&self) -> bool {
        matches!(self, SeasonEvent::PerformanceAssessed { .. })
    }

    /// True for an improvement or a decline.
    pub fn is_score_change(&self) -> bool {
        matches!(
            self,
            SeasonEvent::PerformanceImproved { .. } | SeasonEvent::PerformanceDeclined { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SeasonEvent::PerformanceAssessed {
            player_id: PlayerId(660271),
            season: SeasonYear(2024),
            category: StatCategory::Batting,
            date: NaiveDate::from_ymd_opt(2024, 4, 11).unwrap(),
            score: PerformanceScore::new(0.75),
            participation_met: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "performance_assessed");
        assert_eq!(json["category"], "batting");
        assert_eq!(json["date"], "2024-04-11");
        assert_eq!(json["score"], 0.75);
        assert_eq!(json["participation_met"], true);

        let back: SeasonEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn accessors() {
        let event = SeasonEvent::GameLogged {
            player_id: PlayerId(1),
            season: SeasonYear(2024),
            category: StatCategory::Fielding,
            game_id: GameId(745000),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        };
        assert_eq!(event.category(), StatCategory::Fielding);
        assert_eq!(event.player_id(), PlayerId(1));
        assert!(!event.is_assessment());
        assert!(!event.is_score_change());
    }

    #[test]
    fn score_change_events_carry_both_scores() {
        let event = SeasonEvent::PerformanceDeclined {
            player_id: PlayerId(3),
            season: SeasonYear(2024),
            category: StatCategory::Pitching,
            date: NaiveDate::from_ymd_opt(2024, 4, 11).unwrap(),
            previous: PerformanceScore::new(0.6),
            current: PerformanceScore::new(0.3),
            percentage_change: -50.0,
        };
        assert!(event.is_score_change());
        assert!(!event.is_assessment());
        assert_eq!(event.category(), StatCategory::Pitching);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "performance_declined");
        assert_eq!(json["previous"], 0.6);
        assert_eq!(json["current"], 0.3);
        assert_eq!(json["percentage_change"], -50.0);
    }
}
