mod leaderboard;
mod runner;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Parser;
use common::{ControlMode, GameEngine, RoundConfig, ScoreLookup};
use tracing::{error, info, warn};

use crate::leaderboard::LeaderboardStore;
use crate::runner::{MoveScript, RoundSummary, play_round, play_round_paced};

#[derive(Parser, Debug)]
#[command(
    name = "snake-bot",
    about = "Play seeded Snake rounds with the autopilot or a scripted player"
)]
struct Args {
    /// JSON round configuration; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the first round; each following round adds one
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of rounds to play sequentially
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Override the obstacle count
    #[arg(long)]
    obstacles: Option<usize>,

    /// Override the grid width
    #[arg(long)]
    width: Option<u16>,

    /// Override the grid height
    #[arg(long)]
    height: Option<u16>,

    /// Steer manually instead of using the autopilot
    #[arg(long)]
    manual: bool,

    /// Scripted manual moves, one per tick (e.g. "u,u,l,down")
    #[arg(long, requires = "manual")]
    moves: Option<String>,

    /// Pace ticks at the configured tick period instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Name recorded on the leaderboard
    #[arg(long, default_value = "snake-bot")]
    player: String,

    /// JSON file the leaderboard is loaded from and saved to
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Write the per-round summaries to this JSON file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Stop a round without a result after this many ticks
    #[arg(long, default_value_t = 5_000)]
    max_ticks: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!("snake-bot failed: {:#}", err);
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let mode = if args.manual {
        ControlMode::Manual
    } else {
        ControlMode::Autopilot
    };
    let script = match &args.moves {
        Some(moves) => MoveScript::parse(moves)?,
        None => MoveScript::default(),
    };

    let store = match &args.leaderboard {
        Some(path) => LeaderboardStore::open(path, args.player.clone())?,
        None => LeaderboardStore::in_memory(args.player.clone()),
    };
    let store = Arc::new(Mutex::new(store));

    info!(
        "Playing {} round(s) on a {}x{} grid with {} obstacles in {:?} mode, starting at seed {}",
        args.rounds, config.width, config.height, config.obstacle_count, mode, args.seed
    );

    let mut engine = GameEngine::new(config, mode, args.seed, Utc::now().timestamp_millis())?
        .with_result_sink(store.clone());

    let mut summaries = Vec::new();
    for round in 0..args.rounds {
        let seed = args.seed.wrapping_add(round as u64);
        if round > 0 {
            engine.restart(mode, seed, Utc::now().timestamp_millis())?;
        }

        let mut script = script.clone();
        let summary = if args.realtime {
            play_round_paced(&mut engine, &mut script, args.max_ticks).await?
        } else {
            play_round(&mut engine, &mut script, args.max_ticks)?
        };
        log_summary(round + 1, args.rounds, &summary);
        summaries.push(summary);
    }

    let finished: Vec<&RoundSummary> = summaries.iter().filter(|s| s.finished).collect();
    if !finished.is_empty() {
        let total: u32 = finished.iter().map(|s| s.score).sum();
        let best = finished.iter().map(|s| s.score).max().unwrap_or(0);
        info!(
            "{} of {} round(s) finished, best score {}, average {:.1}",
            finished.len(),
            summaries.len(),
            best,
            total as f64 / finished.len() as f64
        );
    }

    if let Some(path) = &args.summary {
        write_summaries(path, &summaries)?;
        info!("Wrote {} round summaries to {}", summaries.len(), path.display());
    }

    let store = store.lock().map_err(|_| anyhow!("Leaderboard lock poisoned"))?;
    for (rank, entry) in store.best_scores(engine.game_id()).iter().enumerate() {
        info!("#{:<2} {:>5}  {}  {}", rank + 1, entry.score, entry.player_name, entry.date);
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<RoundConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RoundConfig::default(),
    };

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(config.width);
        let height = args.height.unwrap_or(config.height);
        // The spawn and the center exclusion follow the new board size.
        let layout = RoundConfig::with_dimensions(width, height);
        config.width = width;
        config.height = height;
        config.initial_snake = layout.initial_snake;
        config.center_exclusion = layout.center_exclusion;
    }
    if let Some(obstacles) = args.obstacles {
        config.obstacle_count = obstacles;
    }

    config.validate().context("Invalid round configuration")?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<RoundConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn write_summaries(path: &Path, summaries: &[RoundSummary]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries)?;
    fs::write(path, json).with_context(|| format!("Failed to write summary {}", path.display()))
}

fn log_summary(round: u32, total: u32, summary: &RoundSummary) {
    if summary.finished {
        info!(
            "Round {}/{} (seed {}): score {} after {} ticks, length {} [path {}, survival {}, hold {}]",
            round,
            total,
            summary.seed,
            summary.score,
            summary.ticks,
            summary.length,
            summary.path_ticks,
            summary.survival_ticks,
            summary.hold_ticks
        );
    } else {
        warn!(
            "Round {}/{} (seed {}) stopped after {} ticks with score {}",
            round, total, summary.seed, summary.ticks, summary.score
        );
    }
}
