use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Position { x, y }
    }

    /// The adjacent cell one step away in `direction`. May lie outside the grid.
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.unit_vector();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan_distance(&self, other: &Position) -> u16 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u16
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Search order used by the planner. Earlier entries win ties.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Screen-space unit vector; y grows downward.
    pub fn unit_vector(&self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(anyhow!("Unknown direction: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Front is the head, back is the tail.
    pub body: VecDeque<Position>,
    pub direction: Direction,
    pub is_alive: bool,
}

impl Snake {
    pub fn new(body: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        Snake {
            body: body.into_iter().collect(),
            direction,
            is_alive: true,
        }
    }

    pub fn head(&self) -> Result<&Position> {
        self.body.front().context("Snake body should not be empty")
    }

    pub fn tail(&self) -> Result<&Position> {
        self.body.back().context("Snake body should not be empty")
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn contains_point(&self, point: &Position) -> bool {
        self.body.iter().any(|segment| segment == point)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// True when no two segments share a cell.
    pub fn is_self_disjoint(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.body.len());
        self.body.iter().all(|segment| seen.insert(*segment))
    }
}
