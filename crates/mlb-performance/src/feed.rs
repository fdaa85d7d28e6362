// Game-log feed: per-category CSV files of per-game stat lines.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::config::DataPaths;
use crate::stats::{
    BattingGame, BattingStats, FieldingGame, FieldingStats, GameId, GameSnapshot, InningsCount,
    InningsParseError, PitchingGame, PitchingStats, PlayerId, Position, SeasonYear, TeamId,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Every game line read from the feed, across players.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameLogs {
    pub batting: Vec<BattingGame>,
    pub pitching: Vec<PitchingGame>,
    pub fielding: Vec<FieldingGame>,
}

impl GameLogs {
    /// Split into one `GameLogs` per (player, season).
    pub fn by_player_season(self) -> BTreeMap<(PlayerId, SeasonYear), GameLogs> {
        let mut out: BTreeMap<(PlayerId, SeasonYear), GameLogs> = BTreeMap::new();
        for (key, games) in group_by_player_season(self.batting) {
            out.entry(key).or_default().batting = games;
        }
        for (key, games) in group_by_player_season(self.pitching) {
            out.entry(key).or_default().pitching = games;
        }
        for (key, games) in group_by_player_season(self.fielding) {
            out.entry(key).or_default().fielding = games;
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.batting.is_empty() && self.pitching.is_empty() && self.fielding.is_empty()
    }
}

/// Bucket snapshots by (player, season), keeping input order within a bucket.
pub fn group_by_player_season<G: GameSnapshot>(
    games: Vec<G>,
) -> BTreeMap<(PlayerId, SeasonYear), Vec<G>> {
    let mut groups: BTreeMap<(PlayerId, SeasonYear), Vec<G>> = BTreeMap::new();
    for game in games {
        groups
            .entry((game.player_id(), game.season()))
            .or_default()
            .push(game);
    }
    groups
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// One batting line per row.
#[derive(Debug, Deserialize)]
struct RawBattingRow {
    player_id: u32,
    season: u16,
    game_id: u32,
    game_date: NaiveDate,
    team_id: u32,
    #[serde(default)]
    plate_appearances: u32,
    #[serde(default)]
    at_bats: u32,
    #[serde(default)]
    runs: u32,
    #[serde(default)]
    hits: u32,
    #[serde(default)]
    doubles: u32,
    #[serde(default)]
    triples: u32,
    #[serde(default)]
    home_runs: u32,
    #[serde(default)]
    runs_batted_in: u32,
    #[serde(default)]
    base_on_balls: u32,
    #[serde(default)]
    intentional_walks: u32,
    #[serde(default)]
    strikeouts: u32,
    #[serde(default)]
    stolen_bases: u32,
    #[serde(default)]
    caught_stealing: u32,
    #[serde(default)]
    hit_by_pitches: u32,
    #[serde(default)]
    sacrifice_bunts: u32,
    #[serde(default)]
    sacrifice_flies: u32,
    #[serde(default)]
    number_of_pitches_seen: u32,
    #[serde(default)]
    left_on_base: u32,
    #[serde(default)]
    ground_outs: u32,
    #[serde(default)]
    ground_into_double_plays: u32,
    #[serde(default)]
    ground_into_triple_plays: u32,
    #[serde(default)]
    air_outs: u32,
    #[serde(default)]
    catcher_interferences: u32,
}

/// One pitching line per row. `innings_pitched` uses box-score shorthand
/// (`6.1`) or decimals (`6.333`); an empty cell is zero. Decisions are 0/1.
#[derive(Debug, Deserialize)]
struct RawPitchingRow {
    player_id: u32,
    season: u16,
    game_id: u32,
    game_date: NaiveDate,
    team_id: u32,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    losses: u32,
    #[serde(default)]
    games_started: u32,
    #[serde(default)]
    games_finished: u32,
    #[serde(default)]
    complete_games: u32,
    #[serde(default)]
    shutouts: u32,
    #[serde(default)]
    holds: u32,
    #[serde(default)]
    saves: u32,
    #[serde(default)]
    blown_saves: u32,
    #[serde(default)]
    save_opportunities: u32,
    #[serde(default)]
    innings_pitched: String,
    #[serde(default)]
    hits: u32,
    #[serde(default)]
    doubles: u32,
    #[serde(default)]
    triples: u32,
    #[serde(default)]
    home_runs: u32,
    #[serde(default)]
    runs: u32,
    #[serde(default)]
    earned_runs: u32,
    #[serde(default)]
    strikeouts: u32,
    #[serde(default)]
    base_on_balls: u32,
    #[serde(default)]
    intentional_walks: u32,
    #[serde(default)]
    hit_batsmen: u32,
    #[serde(default)]
    outs: u32,
    #[serde(default)]
    ground_outs: u32,
    #[serde(default)]
    air_outs: u32,
    #[serde(default)]
    ground_into_double_plays: u32,
    #[serde(default)]
    number_of_pitches: u32,
    #[serde(default)]
    strikes: u32,
    #[serde(default)]
    wild_pitches: u32,
    #[serde(default)]
    balks: u32,
    #[serde(default)]
    batters_faced: u32,
    #[serde(default)]
    at_bats: u32,
    #[serde(default)]
    stolen_bases: u32,
    #[serde(default)]
    caught_stealing: u32,
    #[serde(default)]
    pickoffs: u32,
    #[serde(default)]
    inherited_runners: u32,
    #[serde(default)]
    inherited_runners_scored: u32,
    #[serde(default)]
    catcher_interferences: u32,
    #[serde(default)]
    sacrifice_bunts: u32,
    #[serde(default)]
    sacrifice_flies: u32,
}

/// One fielding line per row and position played.
#[derive(Debug, Deserialize)]
struct RawFieldingRow {
    player_id: u32,
    season: u16,
    game_id: u32,
    game_date: NaiveDate,
    team_id: u32,
    position: String,
    #[serde(default)]
    games_started: u32,
    #[serde(default)]
    innings_played: String,
    #[serde(default)]
    assists: u32,
    #[serde(default)]
    putouts: u32,
    #[serde(default)]
    errors: u32,
    #[serde(default)]
    throwing_errors: u32,
    #[serde(default)]
    double_plays: u32,
    #[serde(default)]
    triple_plays: u32,
    #[serde(default)]
    caught_stealing: u32,
    #[serde(default)]
    stolen_bases: u32,
    #[serde(default)]
    passed_balls: u32,
    #[serde(default)]
    catcher_interferences: u32,
    #[serde(default)]
    wild_pitches: u32,
    #[serde(default)]
    pickoffs: u32,
}

/// An empty innings cell is zero innings.
fn parse_innings(cell: &str) -> Result<InningsCount, InningsParseError> {
    if cell.trim().is_empty() {
        Ok(InningsCount::ZERO)
    } else {
        cell.parse()
    }
}

impl RawBattingRow {
    fn into_game(self) -> BattingGame {
        BattingGame {
            player_id: PlayerId(self.player_id),
            season: SeasonYear(self.season),
            game_id: GameId(self.game_id),
            game_date: self.game_date,
            team_id: TeamId(self.team_id),
            stats: BattingStats {
                plate_appearances: self.plate_appearances,
                at_bats: self.at_bats,
                runs: self.runs,
                hits: self.hits,
                doubles: self.doubles,
                triples: self.triples,
                home_runs: self.home_runs,
                runs_batted_in: self.runs_batted_in,
                base_on_balls: self.base_on_balls,
                intentional_walks: self.intentional_walks,
                strikeouts: self.strikeouts,
                stolen_bases: self.stolen_bases,
                caught_stealing: self.caught_stealing,
                hit_by_pitches: self.hit_by_pitches,
                sacrifice_bunts: self.sacrifice_bunts,
                sacrifice_flies: self.sacrifice_flies,
                number_of_pitches_seen: self.number_of_pitches_seen,
                left_on_base: self.left_on_base,
                ground_outs: self.ground_outs,
                ground_into_double_plays: self.ground_into_double_plays,
                ground_into_triple_plays: self.ground_into_triple_plays,
                air_outs: self.air_outs,
                catcher_interferences: self.catcher_interferences,
            },
        }
    }
}

impl RawPitchingRow {
    fn into_game(self) -> Result<PitchingGame, InningsParseError> {
        let innings_pitched = parse_innings(&self.innings_pitched)?;
        let mut stats = PitchingStats {
            wins: self.wins,
            losses: self.losses,
            games_started: self.games_started,
            games_finished: self.games_finished,
            complete_games: self.complete_games,
            shutouts: self.shutouts,
            holds: self.holds,
            saves: self.saves,
            blown_saves: self.blown_saves,
            save_opportunities: self.save_opportunities,
            innings_pitched,
            hits: self.hits,
            doubles: self.doubles,
            triples: self.triples,
            home_runs: self.home_runs,
            runs: self.runs,
            earned_runs: self.earned_runs,
            strikeouts: self.strikeouts,
            base_on_balls: self.base_on_balls,
            intentional_walks: self.intentional_walks,
            hit_batsmen: self.hit_batsmen,
            outs: self.outs,
            ground_outs: self.ground_outs,
            air_outs: self.air_outs,
            ground_into_double_plays: self.ground_into_double_plays,
            number_of_pitches: self.number_of_pitches,
            strikes: self.strikes,
            wild_pitches: self.wild_pitches,
            balks: self.balks,
            batters_faced: self.batters_faced,
            at_bats: self.at_bats,
            stolen_bases: self.stolen_bases,
            caught_stealing: self.caught_stealing,
            pickoffs: self.pickoffs,
            inherited_runners: self.inherited_runners,
            inherited_runners_scored: self.inherited_runners_scored,
            catcher_interferences: self.catcher_interferences,
            sacrifice_bunts: self.sacrifice_bunts,
            sacrifice_flies: self.sacrifice_flies,
            quality_starts: 0,
        };
        stats.quality_starts = u32::from(stats.is_quality_start());
        Ok(PitchingGame {
            player_id: PlayerId(self.player_id),
            season: SeasonYear(self.season),
            game_id: GameId(self.game_id),
            game_date: self.game_date,
            team_id: TeamId(self.team_id),
            stats,
        })
    }
}

impl RawFieldingRow {
    fn into_game(self, position: Position) -> Result<FieldingGame, InningsParseError> {
        let innings_played = parse_innings(&self.innings_played)?;
        Ok(FieldingGame {
            player_id: PlayerId(self.player_id),
            season: SeasonYear(self.season),
            game_id: GameId(self.game_id),
            game_date: self.game_date,
            team_id: TeamId(self.team_id),
            position,
            stats: FieldingStats {
                games_started: self.games_started,
                innings_played,
                assists: self.assists,
                putouts: self.putouts,
                errors: self.errors,
                throwing_errors: self.throwing_errors,
                double_plays: self.double_plays,
                triple_plays: self.triple_plays,
                caught_stealing: self.caught_stealing,
                stolen_bases: self.stolen_bases,
                passed_balls: self.passed_balls,
                catcher_interferences: self.catcher_interferences,
                wild_pitches: self.wild_pitches,
                pickoffs: self.pickoffs,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<BattingGame>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut games = Vec::new();
    for result in reader.deserialize::<RawBattingRow>() {
        match result {
            Ok(raw) => games.push(raw.into_game()),
            Err(e) => warn!("skipping malformed batting row: {}", e),
        }
    }
    Ok(games)
}

fn load_pitching_from_reader<R: Read>(rdr: R) -> Result<Vec<PitchingGame>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut games = Vec::new();
    for result in reader.deserialize::<RawPitchingRow>() {
        match result {
            Ok(raw) => {
                let (player, game) = (raw.player_id, raw.game_id);
                match raw.into_game() {
                    Ok(g) => games.push(g),
                    Err(e) => warn!("skipping pitching line of player {player} in game {game}: {e}"),
                }
            }
            Err(e) => warn!("skipping malformed pitching row: {}", e),
        }
    }
    Ok(games)
}

fn load_fielding_from_reader<R: Read>(rdr: R) -> Result<Vec<FieldingGame>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut games = Vec::new();
    for result in reader.deserialize::<RawFieldingRow>() {
        match result {
            Ok(raw) => {
                let (player, game) = (raw.player_id, raw.game_id);
                let Some(position) = Position::from_abbreviation(&raw.position) else {
                    warn!(
                        "skipping fielding line of player {player} in game {game}: unknown position '{}'",
                        raw.position
                    );
                    continue;
                };
                match raw.into_game(position) {
                    Ok(g) => games.push(g),
                    Err(e) => warn!("skipping fielding line of player {player} in game {game}: {e}"),
                }
            }
            Err(e) => warn!("skipping malformed fielding row: {}", e),
        }
    }
    Ok(games)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, FeedError> {
    std::fs::File::open(path).map_err(|e| FeedError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> FeedError + '_ {
    move |e| FeedError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

/// Load batting lines from a CSV file.
pub fn load_batting_games(path: &Path) -> Result<Vec<BattingGame>, FeedError> {
    load_batting_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load pitching lines from a CSV file.
pub fn load_pitching_games(path: &Path) -> Result<Vec<PitchingGame>, FeedError> {
    load_pitching_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load fielding lines from a CSV file.
pub fn load_fielding_games(path: &Path) -> Result<Vec<FieldingGame>, FeedError> {
    load_fielding_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load all three game logs from the configured paths.
pub fn load_game_logs(paths: &DataPaths) -> Result<GameLogs, FeedError> {
    Ok(GameLogs {
        batting: load_batting_games(Path::new(&paths.batting))?,
        pitching: load_pitching_games(Path::new(&paths.pitching))?,
        fielding: load_fielding_games(Path::new(&paths.fielding))?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
