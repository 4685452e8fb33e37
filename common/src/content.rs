use std::collections::BTreeSet;

use log::{debug, warn};

use crate::config::{ExclusionBox, RoundConfig};
use crate::error::ContentError;
use crate::grid::Grid;
use crate::util::PseudoRandom;
use crate::{Position, Snake};

/// Places obstacles and food by rejection sampling.
///
/// Sampling is bounded: once `max_attempts` draws have been rejected the
/// generator enumerates the remaining eligible cells and picks one by index,
/// so placement terminates however full the board is.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    grid: Grid,
    center_exclusion: ExclusionBox,
    head_clearance: i16,
    max_attempts: usize,
}

impl ContentGenerator {
    pub fn new(config: &RoundConfig) -> Self {
        ContentGenerator {
            grid: Grid::new(config.width, config.height),
            center_exclusion: config.center_exclusion,
            head_clearance: config.head_clearance,
            max_attempts: config.sampling_attempts(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn place_obstacles(
        &self,
        snake: &Snake,
        count: usize,
        rng: &mut PseudoRandom,
    ) -> Result<BTreeSet<Position>, ContentError> {
        let head = snake.body.front().copied();
        let mut obstacles = BTreeSet::new();
        let mut attempts = 0;

        while obstacles.len() < count && attempts < self.max_attempts {
            attempts += 1;
            let candidate = self.sample(rng);
            if self.obstacle_allowed(&candidate, snake, head, &obstacles) {
                obstacles.insert(candidate);
            }
        }

        if obstacles.len() < count {
            let mut free: Vec<Position> = self
                .grid
                .cells()
                .filter(|cell| self.obstacle_allowed(cell, snake, head, &obstacles))
                .collect();
            let missing = count - obstacles.len();
            warn!(
                "Obstacle sampling gave up after {} attempts, scanning {} free cells for {} more",
                attempts,
                free.len(),
                missing
            );
            if free.len() < missing {
                return Err(ContentError::InsufficientSpace {
                    requested: count,
                    available: obstacles.len() + free.len(),
                });
            }
            for _ in 0..missing {
                let index = rng.next_index(free.len());
                obstacles.insert(free.swap_remove(index));
            }
        }

        debug!("Placed {} obstacles after {} draws", obstacles.len(), attempts);
        Ok(obstacles)
    }

    /// Picks a cell free of snake and obstacles, or `None` when the board is full.
    pub fn place_food(
        &self,
        snake: &Snake,
        obstacles: &BTreeSet<Position>,
        rng: &mut PseudoRandom,
    ) -> Option<Position> {
        for _ in 0..self.max_attempts {
            let candidate = self.sample(rng);
            if !self.grid.is_occupied(&candidate, snake, obstacles) {
                return Some(candidate);
            }
        }

        let free: Vec<Position> = self
            .grid
            .cells()
            .filter(|cell| !self.grid.is_occupied(cell, snake, obstacles))
            .collect();
        warn!(
            "Food sampling gave up after {} attempts, {} free cells left",
            self.max_attempts,
            free.len()
        );
        if free.is_empty() {
            return None;
        }
        Some(free[rng.next_index(free.len())])
    }

    fn sample(&self, rng: &mut PseudoRandom) -> Position {
        Position {
            x: rng.next_below(self.grid.width as u32) as i16,
            y: rng.next_below(self.grid.height as u32) as i16,
        }
    }

    fn obstacle_allowed(
        &self,
        pos: &Position,
        snake: &Snake,
        head: Option<Position>,
        accepted: &BTreeSet<Position>,
    ) -> bool {
        if snake.contains_point(pos) || accepted.contains(pos) {
            return false;
        }
        if self.center_exclusion.contains(pos) {
            return false;
        }
        match head {
            Some(head) => {
                (pos.x - head.x).abs() >= self.head_clearance
                    || (pos.y - head.y).abs() >= self.head_clearance
            }
            None => true,
        }
    }
}
