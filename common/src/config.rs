use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::{Direction, Position};

/// Axis-aligned box of cells where obstacles may not spawn, bounds exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionBox {
    pub min_x: i16,
    pub min_y: i16,
    pub max_x: i16,
    pub max_y: i16,
}

impl ExclusionBox {
    /// Box covering the cells strictly inside `(center - 2, center + 2)` on both axes.
    pub fn around_center(width: u16, height: u16) -> Self {
        let cx = (width / 2) as i16;
        let cy = (height / 2) as i16;
        ExclusionBox {
            min_x: cx - 2,
            min_y: cy - 2,
            max_x: cx + 2,
            max_y: cy + 2,
        }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x > self.min_x && pos.x < self.max_x && pos.y > self.min_y && pos.y < self.max_y
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub width: u16,
    pub height: u16,
    /// Head first.
    pub initial_snake: Vec<Position>,
    pub initial_direction: Direction,
    pub obstacle_count: usize,
    pub food_reward: u32,
    pub center_exclusion: ExclusionBox,
    pub head_clearance: i16,
    /// Random draws allowed per placement; 0 means `SAMPLING_ATTEMPTS_PER_CELL` per cell.
    pub max_sampling_attempts: usize,
    pub manual_tick_ms: u64,
    pub autopilot_tick_ms: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig::with_dimensions(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}

impl RoundConfig {
    /// Standard round on a `width` x `height` grid: a vertical snake of three
    /// centred on the board, heading up.
    pub fn with_dimensions(width: u16, height: u16) -> Self {
        let cx = (width / 2) as i16;
        let cy = (height / 2) as i16;
        RoundConfig {
            width,
            height,
            initial_snake: vec![
                Position::new(cx, cy),
                Position::new(cx, cy + 1),
                Position::new(cx, cy + 2),
            ],
            initial_direction: Direction::Up,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            food_reward: FOOD_REWARD,
            center_exclusion: ExclusionBox::around_center(width, height),
            head_clearance: HEAD_CLEARANCE,
            max_sampling_attempts: 0,
            manual_tick_ms: DEFAULT_TICK_INTERVAL_MS,
            autopilot_tick_ms: AUTOPILOT_TICK_INTERVAL_MS,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn sampling_attempts(&self) -> usize {
        if self.max_sampling_attempts == 0 {
            self.cell_count() * SAMPLING_ATTEMPTS_PER_CELL
        } else {
            self.max_sampling_attempts
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 || self.width > i16::MAX as u16 || self.height > i16::MAX as u16 {
            return Err(ConfigError::UnsupportedGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.manual_tick_ms == 0 || self.autopilot_tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.initial_snake.len() < 3 {
            return Err(ConfigError::SnakeTooShort(self.initial_snake.len()));
        }

        let in_bounds = |p: &Position| {
            p.x >= 0 && p.y >= 0 && p.x < self.width as i16 && p.y < self.height as i16
        };
        for (index, segment) in self.initial_snake.iter().enumerate() {
            if !in_bounds(segment) {
                return Err(ConfigError::SegmentOutOfBounds(*segment));
            }
            if self.initial_snake[..index].contains(segment) {
                return Err(ConfigError::OverlappingSegments(*segment));
            }
        }
        for pair in self.initial_snake.windows(2) {
            if pair[0].manhattan_distance(&pair[1]) != 1 {
                return Err(ConfigError::DisconnectedSegments(pair[0], pair[1]));
            }
        }

        let head = self.initial_snake[0];
        if head.step(self.initial_direction) == self.initial_snake[1] {
            return Err(ConfigError::ReversedSpawn);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_classic_board() {
        let config = RoundConfig::default();
        assert_eq!((config.width, config.height), (20, 20));
        assert_eq!(
            config.initial_snake,
            vec![Position::new(10, 10), Position::new(10, 11), Position::new(10, 12)]
        );
        assert_eq!(config.initial_direction, Direction::Up);
        assert_eq!(config.obstacle_count, 8);
        assert_eq!(config.food_reward, 10);
        assert_eq!((config.manual_tick_ms, config.autopilot_tick_ms), (100, 150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn center_box_matches_open_interval() {
        let exclusion = ExclusionBox::around_center(20, 20);
        assert!(exclusion.contains(&Position::new(9, 9)));
        assert!(exclusion.contains(&Position::new(11, 11)));
        assert!(!exclusion.contains(&Position::new(8, 10)));
        assert!(!exclusion.contains(&Position::new(10, 12)));
    }

    #[test]
    fn rejects_broken_spawns() {
        let mut config = RoundConfig::default();
        config.initial_snake.truncate(2);
        assert_eq!(config.validate(), Err(ConfigError::SnakeTooShort(2)));

        let mut config = RoundConfig::default();
        config.initial_snake[2] = Position::new(12, 12);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DisconnectedSegments(_, _))
        ));

        let mut config = RoundConfig::default();
        config.initial_direction = Direction::Down;
        assert_eq!(config.validate(), Err(ConfigError::ReversedSpawn));

        let mut config = RoundConfig::default();
        config.autopilot_tick_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() -> anyhow::Result<()> {
        let config: RoundConfig = serde_json::from_str(r#"{ "obstacle_count": 0 }"#)?;
        assert_eq!(config.obstacle_count, 0);
        assert_eq!(config.width, 20);
        Ok(())
    }
}
