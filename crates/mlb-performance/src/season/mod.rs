// One player's season: the game log aggregate, its events and the
// scorekeeper that feeds it.

pub mod aggregate;
pub mod events;
pub mod scorekeeper;

pub use aggregate::{AssessmentRecord, PlayerSeasonStats, SeasonGame};
pub use events::SeasonEvent;
pub use scorekeeper::{AssessmentSchedule, Scorekeeper, WeeklyAssessment};
