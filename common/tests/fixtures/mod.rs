#![allow(dead_code)]

use std::collections::BTreeSet;

use common::{Direction, GameState, Position, RoundConfig, Snake};

pub fn pos(x: i16, y: i16) -> Position {
    Position::new(x, y)
}

/// Round with an explicit layout and no generated content.
pub fn layout(
    width: u16,
    height: u16,
    body: &[(i16, i16)],
    direction: Direction,
    obstacles: &[(i16, i16)],
    food: Option<(i16, i16)>,
) -> GameState {
    let mut config = RoundConfig::with_dimensions(width, height);
    config.obstacle_count = obstacles.len();
    let snake = Snake::new(body.iter().map(|&(x, y)| pos(x, y)), direction);
    let obstacles: BTreeSet<Position> = obstacles.iter().map(|&(x, y)| pos(x, y)).collect();
    GameState::with_layout(config, snake, obstacles, food.map(|(x, y)| pos(x, y)), 99)
}

pub fn assert_round_invariants(state: &GameState) {
    if !state.is_alive() {
        return;
    }
    assert!(state.snake.is_self_disjoint(), "duplicate segments at tick {}", state.tick);
    for segment in state.snake.segments() {
        assert!(state.grid.in_bounds(segment), "segment {segment} out of bounds");
        assert!(!state.obstacles.contains(segment), "segment {segment} on an obstacle");
    }
    if let Some(food) = state.food {
        assert!(!state.snake.contains_point(&food), "food {food} under the snake");
        assert!(!state.obstacles.contains(&food), "food {food} on an obstacle");
    }
}
