use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("cannot place {requested} obstacles: only {available} eligible cells remain")]
    InsufficientSpace { requested: usize, available: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported grid size {width}x{height}")]
    UnsupportedGrid { width: u16, height: u16 },
    #[error("initial snake needs at least 3 segments, got {0}")]
    SnakeTooShort(usize),
    #[error("initial snake segment {0} lies outside the grid")]
    SegmentOutOfBounds(Position),
    #[error("initial snake segments {0} and {1} are not adjacent")]
    DisconnectedSegments(Position, Position),
    #[error("initial snake overlaps itself at {0}")]
    OverlappingSegments(Position),
    #[error("the initial direction would reverse into the second segment")]
    ReversedSpawn,
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}
