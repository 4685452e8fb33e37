use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Direction, Position, Snake};

/// Fixed-size rectangular board. All queries are pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: u16,
    pub height: u16,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        Grid { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i16 && pos.y >= 0 && pos.y < self.height as i16
    }

    pub fn is_occupied(&self, pos: &Position, snake: &Snake, obstacles: &BTreeSet<Position>) -> bool {
        obstacles.contains(pos) || snake.contains_point(pos)
    }

    /// Out of bounds or occupied. Every snake segment blocks, the tail included.
    pub fn is_blocked(&self, pos: &Position, snake: &Snake, obstacles: &BTreeSet<Position>) -> bool {
        !self.in_bounds(pos) || self.is_occupied(pos, snake, obstacles)
    }

    pub fn neighbor(&self, pos: &Position, direction: Direction) -> Option<Position> {
        let next = pos.step(direction);
        self.in_bounds(&next).then_some(next)
    }

    /// Row-major index of an in-bounds cell.
    pub fn index(&self, pos: &Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i16)
            .flat_map(move |y| (0..self.width as i16).map(move |x| Position::new(x, y)))
    }
}
