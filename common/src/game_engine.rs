use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::ai::{PlannerTier, plan_move};
use crate::constants::{SNAKE_GAME_ID, SNAKE_GAME_NAME};
use crate::results::{GameResult, ResultSink};
use crate::{Direction, GameEvent, GameState, RoundConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    Manual,
    Autopilot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineStatus {
    Running,
    /// The snake died and the result was reported.
    Finished,
    /// Scheduling was cancelled before the snake died. Nothing is reported.
    Stopped,
}

/// What happened during a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub tick: u32,
    /// Direction the snake headed in after the tick.
    pub direction: Direction,
    /// Set when the autopilot chose the move.
    pub tier: Option<PlannerTier>,
    pub events: Vec<GameEvent>,
}

/// Fixed-period scheduler for one round at a time.
pub struct GameEngine {
    game_name: String,
    game_id: String,
    state: GameState,
    mode: ControlMode,
    status: EngineStatus,
    pending_direction: Direction,
    seed: u64,
    start_ms: i64,
    report_autopilot_results: bool,
    last_result: Option<GameResult>,
    result_sink: Option<Box<dyn ResultSink + Send>>,
}

impl GameEngine {
    pub fn new(config: RoundConfig, mode: ControlMode, seed: u64, start_ms: i64) -> Result<Self> {
        let state = GameState::new(config, seed).context("Failed to start round")?;
        let pending_direction = state.direction();
        Ok(GameEngine {
            game_name: SNAKE_GAME_NAME.to_string(),
            game_id: SNAKE_GAME_ID.to_string(),
            state,
            mode,
            status: EngineStatus::Running,
            pending_direction,
            seed,
            start_ms,
            report_autopilot_results: true,
            last_result: None,
            result_sink: None,
        })
    }

    /// Runs an explicit round instead of a generated one.
    pub fn from_state(state: GameState, mode: ControlMode, start_ms: i64) -> Self {
        let pending_direction = state.direction();
        let status = if state.is_alive() {
            EngineStatus::Running
        } else {
            EngineStatus::Finished
        };
        GameEngine {
            game_name: SNAKE_GAME_NAME.to_string(),
            game_id: SNAKE_GAME_ID.to_string(),
            state,
            mode,
            status,
            pending_direction,
            seed: 0,
            start_ms,
            report_autopilot_results: true,
            last_result: None,
            result_sink: None,
        }
    }

    pub fn with_result_sink(mut self, sink: impl ResultSink + Send + 'static) -> Self {
        self.result_sink = Some(Box::new(sink));
        self
    }

    /// Whether rounds played by the autopilot are reported to the sink.
    pub fn set_report_autopilot_results(&mut self, report: bool) {
        self.report_autopilot_results = report;
    }

    /// Replaces the current round with a fresh one; the previous result, if
    /// any, has already been reported.
    pub fn restart(&mut self, mode: ControlMode, seed: u64, start_ms: i64) -> Result<()> {
        let config = self.state.config.clone();
        self.state = GameState::new(config, seed).context("Failed to restart round")?;
        self.mode = mode;
        self.status = EngineStatus::Running;
        self.pending_direction = self.state.direction();
        self.seed = seed;
        self.start_ms = start_ms;
        self.last_result = None;
        Ok(())
    }

    /// Manual steering. Returns `false` when the input is ignored: it would
    /// reverse the snake, the autopilot is driving, or the round is over.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.mode == ControlMode::Autopilot || self.status != EngineStatus::Running {
            return false;
        }
        if !self.state.can_turn(direction) {
            debug!("Ignoring reversing input {}", direction);
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Cancels further ticks without reporting a result.
    pub fn stop(&mut self) {
        if self.status == EngineStatus::Running {
            info!("Round stopped at tick {} with score {}", self.state.tick, self.state.score);
            self.status = EngineStatus::Stopped;
        }
    }

    /// Advances the round by exactly one move. Returns `None` once the round
    /// is no longer running.
    pub fn tick(&mut self) -> Result<Option<TickOutcome>> {
        if self.status != EngineStatus::Running {
            return Ok(None);
        }

        let (direction, tier) = match self.mode {
            ControlMode::Autopilot => {
                let planned = plan_move(&self.state);
                (planned.direction, Some(planned.tier))
            }
            ControlMode::Manual => (self.pending_direction, None),
        };

        let events = self.state.step(direction)?;
        self.pending_direction = self.state.direction();

        if !self.state.is_alive() {
            self.finish()?;
        }

        Ok(Some(TickOutcome {
            tick: self.state.tick,
            direction: self.state.direction(),
            tier,
            events,
        }))
    }

    /// Runs the ticks due by `ts_ms`, stopping early if the snake dies.
    pub fn run_until(&mut self, ts_ms: i64) -> Result<Vec<GameEvent>> {
        let period_ms = self.tick_interval().as_millis() as i64;
        let elapsed_ms = (ts_ms - self.start_ms).max(0);
        let target_tick = (elapsed_ms / period_ms.max(1)) as u32;
        let mut out = Vec::new();

        while self.state.current_tick() < target_tick {
            match self.tick()? {
                Some(outcome) => out.extend(outcome.events),
                None => break,
            }
        }

        Ok(out)
    }

    /// Plays until the round ends or `max_ticks` ticks have run. Returns the
    /// number of ticks executed.
    pub fn run_to_completion(&mut self, max_ticks: u32) -> Result<u32> {
        let mut ticks = 0;
        while ticks < max_ticks {
            if self.tick()?.is_none() {
                break;
            }
            ticks += 1;
        }
        Ok(ticks)
    }

    fn finish(&mut self) -> Result<()> {
        self.status = EngineStatus::Finished;
        let result = GameResult {
            game_name: self.game_name.clone(),
            game_id: self.game_id.clone(),
            score: self.state.score,
        };
        info!(
            "Round over after {} ticks: {} scored {} ({:?})",
            self.state.tick, result.game_name, result.score, self.mode
        );

        let should_report = self.mode == ControlMode::Manual || self.report_autopilot_results;
        if should_report {
            if let Some(sink) = self.result_sink.as_mut() {
                sink.report(&result).context("Failed to report game result")?;
            }
        }
        self.last_result = Some(result);
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        let ms = match self.mode {
            ControlMode::Manual => self.state.config.manual_tick_ms,
            ControlMode::Autopilot => self.state.config.autopilot_tick_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    pub fn current_tick(&self) -> u32 {
        self.state.current_tick()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;

    use super::*;

    fn quiet_config() -> RoundConfig {
        let mut config = RoundConfig::default();
        config.obstacle_count = 0;
        config
    }

    #[test]
    fn manual_round_reports_once() -> Result<()> {
        let sink = Arc::new(Mutex::new(Vec::<GameResult>::new()));
        let mut engine =
            GameEngine::new(quiet_config(), ControlMode::Manual, 1, 0)?.with_result_sink(sink.clone());

        // Heading up from y = 10 reaches the wall on the eleventh tick.
        let ticks = engine.run_to_completion(100)?;
        assert_eq!(ticks, 11);
        assert_eq!(engine.status(), EngineStatus::Finished);
        assert!(engine.tick()?.is_none());

        let reported = sink.lock().map_err(|_| anyhow!("poisoned"))?;
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].game_id, "SNAKE");
        assert_eq!(engine.game_id(), reported[0].game_id);
        Ok(())
    }

    #[test]
    fn autopilot_ignores_manual_input() -> Result<()> {
        let mut engine = GameEngine::new(quiet_config(), ControlMode::Autopilot, 1, 0)?;
        assert!(!engine.turn(Direction::Left));
        assert_eq!(engine.tick_interval(), Duration::from_millis(150));
        Ok(())
    }

    #[test]
    fn manual_reversal_is_ignored() -> Result<()> {
        let mut engine = GameEngine::new(quiet_config(), ControlMode::Manual, 1, 0)?;
        assert!(!engine.turn(Direction::Down));
        assert!(engine.turn(Direction::Left));
        // Still heading up, so down is a reversal even with left pending.
        assert!(!engine.turn(Direction::Down));
        let outcome = engine.tick()?.context("round should be running")?;
        assert_eq!(outcome.direction, Direction::Left);
        Ok(())
    }

    #[test]
    fn run_until_follows_the_clock() -> Result<()> {
        let mut engine = GameEngine::new(quiet_config(), ControlMode::Manual, 1, 1_000)?;
        assert!(engine.run_until(1_050)?.is_empty());
        engine.run_until(1_350)?;
        assert_eq!(engine.current_tick(), 3);
        Ok(())
    }

    #[test]
    fn stopped_round_reports_nothing() -> Result<()> {
        let sink = Arc::new(Mutex::new(Vec::<GameResult>::new()));
        let mut engine = GameEngine::new(quiet_config(), ControlMode::Autopilot, 2, 0)?
            .with_result_sink(sink.clone());
        engine.tick()?;
        engine.stop();
        assert_eq!(engine.status(), EngineStatus::Stopped);
        assert!(engine.tick()?.is_none());
        assert!(sink.lock().map_err(|_| anyhow!("poisoned"))?.is_empty());
        Ok(())
    }
}
