use wasm_bindgen::prelude::*;

use crate::{ControlMode, Direction, EngineStatus, GameEngine, RoundConfig};

/// Browser-facing handle around a single engine. The page owns the timer and
/// calls `tick` once per `tick_interval_ms`.
#[wasm_bindgen]
pub struct SnakeGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl SnakeGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, autopilot: bool) -> Result<SnakeGame, JsValue> {
        let mode = if autopilot {
            ControlMode::Autopilot
        } else {
            ControlMode::Manual
        };
        let engine = GameEngine::new(RoundConfig::default(), mode, seed, 0)
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        Ok(SnakeGame { engine })
    }

    /// Accepts "up", "down", "left", "right". Returns whether the input was taken.
    pub fn turn(&mut self, direction: &str) -> bool {
        match direction.parse::<Direction>() {
            Ok(direction) => self.engine.turn(direction),
            Err(_) => false,
        }
    }

    /// Runs one tick; returns `false` once the round is over.
    pub fn tick(&mut self) -> Result<bool, JsValue> {
        self.engine
            .tick()
            .map(|outcome| outcome.is_some() && self.engine.status() == EngineStatus::Running)
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    pub fn is_alive(&self) -> bool {
        self.engine.state().is_alive()
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.engine.tick_interval().as_millis() as u32
    }

    /// Current round as JSON for the renderer.
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.engine.state()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
