use std::collections::VecDeque;

use anyhow::{Context, Result};
use common::{Direction, EngineStatus, GameEngine, PlannerTier, TickOutcome};
use serde::Serialize;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Per-round tally logged after each round and written by `--summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub seed: u64,
    pub ticks: u32,
    pub score: u32,
    pub length: usize,
    pub finished: bool,
    pub path_ticks: u32,
    pub survival_ticks: u32,
    pub hold_ticks: u32,
}

impl RoundSummary {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        match outcome.tier {
            Some(PlannerTier::PathToFood) => self.path_ticks += 1,
            Some(PlannerTier::Survival) => self.survival_ticks += 1,
            Some(PlannerTier::HoldDirection) => self.hold_ticks += 1,
            None => {}
        }
    }

    fn close(&mut self, engine: &GameEngine) {
        self.score = engine.score();
        self.length = engine.state().snake.length();
        self.finished = engine.status() == EngineStatus::Finished;
    }
}

/// Scripted manual input, one direction fed to the engine per tick.
#[derive(Debug, Clone, Default)]
pub struct MoveScript {
    moves: VecDeque<Direction>,
}

impl MoveScript {
    pub fn new(moves: impl IntoIterator<Item = Direction>) -> Self {
        MoveScript {
            moves: moves.into_iter().collect(),
        }
    }

    /// Parses a comma or whitespace separated list such as `"u,l,down right"`.
    pub fn parse(input: &str) -> Result<Self> {
        let moves = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Direction>()
                    .with_context(|| format!("Invalid move '{}'", token))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MoveScript::new(moves))
    }

    fn feed(&mut self, engine: &mut GameEngine) {
        if let Some(direction) = self.moves.pop_front() {
            if !engine.turn(direction) {
                debug!("Scripted move {} was ignored", direction);
            }
        }
    }
}

/// Plays the current round as fast as possible.
pub fn play_round(engine: &mut GameEngine, script: &mut MoveScript, max_ticks: u32) -> Result<RoundSummary> {
    let mut summary = RoundSummary {
        seed: engine.seed(),
        ..Default::default()
    };

    while summary.ticks < max_ticks {
        script.feed(engine);
        match engine.tick()? {
            Some(outcome) => summary.record(&outcome),
            None => break,
        }
        if engine.status() != EngineStatus::Running {
            break;
        }
    }

    stop_if_capped(engine, max_ticks);
    summary.close(engine);
    Ok(summary)
}

/// Plays the current round at the engine's tick period.
pub async fn play_round_paced(
    engine: &mut GameEngine,
    script: &mut MoveScript,
    max_ticks: u32,
) -> Result<RoundSummary> {
    let mut summary = RoundSummary {
        seed: engine.seed(),
        ..Default::default()
    };
    let mut interval = build_interval(engine.tick_interval());

    while summary.ticks < max_ticks && engine.status() == EngineStatus::Running {
        interval.tick().await;
        script.feed(engine);
        let Some(outcome) = engine.tick()? else {
            break;
        };
        debug!(
            "Tick {} heading {} ({} events)",
            outcome.tick,
            outcome.direction,
            outcome.events.len()
        );
        summary.record(&outcome);
    }

    stop_if_capped(engine, max_ticks);
    summary.close(engine);
    Ok(summary)
}

fn build_interval(period: Duration) -> Interval {
    // The first tick fires one period after the round starts.
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn stop_if_capped(engine: &mut GameEngine, max_ticks: u32) {
    if engine.status() == EngineStatus::Running {
        info!("Round hit the {} tick cap, stopping without a result", max_ticks);
        engine.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ControlMode, GameResult, RoundConfig};
    use std::sync::{Arc, Mutex};

    fn open_config() -> RoundConfig {
        let mut config = RoundConfig::default();
        config.obstacle_count = 0;
        config
    }

    #[test]
    fn parses_mixed_move_lists() -> Result<()> {
        let script = MoveScript::parse("u, L down\tr")?;
        assert_eq!(
            script.moves,
            VecDeque::from([Direction::Up, Direction::Left, Direction::Down, Direction::Right])
        );
        assert!(MoveScript::parse("up, sideways").is_err());
        Ok(())
    }

    #[test]
    fn scripted_round_runs_into_the_wall() -> Result<()> {
        let mut engine = GameEngine::new(open_config(), ControlMode::Manual, 3, 0)?;
        // Turning left at (10, 10) leaves the board on the eleventh tick.
        let mut script = MoveScript::parse("l")?;
        let summary = play_round(&mut engine, &mut script, 1_000)?;

        assert!(summary.finished);
        assert_eq!(summary.ticks, 11);
        assert_eq!(summary.path_ticks, 0);
        Ok(())
    }

    #[test]
    fn tick_cap_stops_without_reporting() -> Result<()> {
        let sink = Arc::new(Mutex::new(Vec::<GameResult>::new()));
        let mut engine = GameEngine::new(open_config(), ControlMode::Autopilot, 3, 0)?
            .with_result_sink(sink.clone());
        let summary = play_round(&mut engine, &mut MoveScript::default(), 5)?;

        assert_eq!(summary.ticks, 5);
        assert!(!summary.finished);
        assert_eq!(engine.status(), EngineStatus::Stopped);
        assert!(sink.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn paced_round_waits_one_period_per_tick() -> Result<()> {
        let mut engine = GameEngine::new(open_config(), ControlMode::Manual, 3, 0)?;
        let started = Instant::now();
        let summary = play_round_paced(&mut engine, &mut MoveScript::default(), 1_000).await?;

        // Heading up from y = 10 dies on the eleventh tick, 100 ms apart.
        assert_eq!(summary.ticks, 11);
        assert!(summary.finished);
        assert!(started.elapsed() >= Duration::from_millis(1_100));
        Ok(())
    }
}
