/// Grid width in cells
pub const DEFAULT_GRID_WIDTH: u16 = 20;

/// Grid height in cells
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Tick interval in milliseconds while a player steers the snake
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Tick interval in milliseconds for autopilot rounds, slower so the demo stays watchable
pub const AUTOPILOT_TICK_INTERVAL_MS: u64 = 150;

/// Obstacles generated at the start of every round
pub const DEFAULT_OBSTACLE_COUNT: usize = 8;

/// Points awarded per food eaten
pub const FOOD_REWARD: u32 = 10;

/// Cells within this Chebyshev radius (exclusive) of the initial head never hold obstacles
pub const HEAD_CLEARANCE: i16 = 3;

/// Random draws per placement before falling back to scanning the free cells
pub const SAMPLING_ATTEMPTS_PER_CELL: usize = 4;

/// Entries kept per game in the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

pub const SNAKE_GAME_ID: &str = "SNAKE";

pub const SNAKE_GAME_NAME: &str = "Snake";
