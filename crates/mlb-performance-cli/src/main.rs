// Scorekeeper entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries events only)
// 2. Load config and build the assessors (invalid criteria stop startup)
// 3. Load the game-log feed
// 4. Score every (player, season) found in the feed
// 5. Print raised events as JSON lines

use std::io::Write;

use mlb_performance::config;
use mlb_performance::feed;
use mlb_performance::season::{PlayerSeasonStats, Scorekeeper};

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Scorekeeper starting up");

    let config = config::load_config().context("failed to load configuration")?;
    let performance = config
        .build_performance_assessor()
        .context("failed to build performance assessor")?;
    let participation = config
        .build_participation_policy()
        .context("failed to build participation policy")?;
    info!(
        "Config loaded: assessing on {}, {:?} participation policy",
        config.assessment_weekday, config.participation.policy
    );

    let logs = feed::load_game_logs(&config.data_paths).context("failed to load game logs")?;
    info!(
        "Loaded {} batting, {} pitching, {} fielding lines",
        logs.batting.len(),
        logs.pitching.len(),
        logs.fielding.len()
    );

    let scorekeeper = Scorekeeper::new(participation, performance, config.schedule());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for ((player_id, season), games) in logs.by_player_season() {
        let mut stats = scorekeeper
            .score_season(
                PlayerSeasonStats::new(player_id, season),
                &games.batting,
                &games.pitching,
                &games.fielding,
            )
            .with_context(|| format!("failed to score player {player_id} season {season}"))?;

        for event in stats.take_events() {
            let line = serde_json::to_string(&event).context("failed to serialize event")?;
            if event.is_score_change() {
                info!("player {player_id} season {season}: {line}");
            }
            writeln!(out, "{line}").context("failed to write event")?;
        }
    }

    info!("Scorekeeper finished");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for events).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("scorekeeper.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mlb_performance=info,scorekeeper=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
