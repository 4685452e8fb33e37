use std::collections::VecDeque;

use log::debug;

use crate::{Direction, GameState, Position};

/// Which rule produced an autopilot decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannerTier {
    /// First step of a shortest path to the food.
    PathToFood,
    /// No path to food; the move with the most reachable space.
    Survival,
    /// Nothing legal; the current direction is kept.
    HoldDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub direction: Direction,
    pub tier: PlannerTier,
}

/// Picks the autopilot's direction for the next tick. Never fails.
pub fn calculate_ai_move(game_state: &GameState) -> Direction {
    plan_move(game_state).direction
}

pub fn plan_move(game_state: &GameState) -> PlannedMove {
    let current_direction = game_state.direction();
    let hold = PlannedMove {
        direction: current_direction,
        tier: PlannerTier::HoldDirection,
    };

    let Ok(head) = game_state.head() else {
        return hold;
    };
    let blocked = BlockedCells::new(game_state);

    if let Some(food) = game_state.food {
        if let Some(direction) = path_to_food(&blocked, *head, food, current_direction) {
            debug!("Autopilot heading {} towards food at {}", direction, food);
            return PlannedMove {
                direction,
                tier: PlannerTier::PathToFood,
            };
        }
    }

    // Survival: maximize reachable area among the legal moves.
    let mut best: Option<(Direction, usize)> = None;
    for direction in Direction::ALL {
        if current_direction.is_opposite(&direction) {
            continue;
        }
        let next = head.step(direction);
        if blocked.is_blocked(&next) {
            continue;
        }

        let space = flood_fill(&blocked, next);
        if best.is_none_or(|(_, max_space)| space > max_space) {
            best = Some((direction, space));
        }
    }

    match best {
        Some((direction, space)) => {
            debug!("Autopilot has no path to food, surviving {} ({} cells)", direction, space);
            PlannedMove {
                direction,
                tier: PlannerTier::Survival,
            }
        }
        None => {
            debug!("Autopilot has no legal move, holding {}", current_direction);
            hold
        }
    }
}

/// First move of a shortest path from the head to `target`, or `None` if the
/// food is unreachable. The first step never reverses the current direction.
pub fn find_path_to_food(game_state: &GameState, target: Position) -> Option<Direction> {
    let head = game_state.head().ok()?;
    let blocked = BlockedCells::new(game_state);
    path_to_food(&blocked, *head, target, game_state.direction())
}

/// Flood-fill score of a candidate move: the number of free cells reachable
/// from the cell the head would enter, that cell included. Zero when the move
/// reverses the snake or enters a blocked cell.
pub fn reachable_area(direction: Direction, game_state: &GameState) -> usize {
    let Ok(head) = game_state.head() else {
        return 0;
    };
    if game_state.direction().is_opposite(&direction) {
        return 0;
    }
    let blocked = BlockedCells::new(game_state);
    let next = head.step(direction);
    if blocked.is_blocked(&next) {
        return 0;
    }
    flood_fill(&blocked, next)
}

/// Number of free cells reachable from `start`, counting `start` itself.
pub fn count_accessible_space(game_state: &GameState, start: Position) -> usize {
    let blocked = BlockedCells::new(game_state);
    if !game_state.grid.in_bounds(&start) {
        return 0;
    }
    flood_fill(&blocked, start)
}

/// Non-reversing directions whose next cell is free.
pub fn legal_directions(game_state: &GameState) -> Vec<Direction> {
    let Ok(head) = game_state.head() else {
        return Vec::new();
    };
    let blocked = BlockedCells::new(game_state);
    Direction::ALL
        .into_iter()
        .filter(|d| !game_state.direction().is_opposite(d))
        .filter(|d| {
            game_state
                .grid
                .neighbor(head, *d)
                .is_some_and(|next| !blocked.is_blocked(&next))
        })
        .collect()
}

/// Length of the shortest free path from `from` to `to`, ignoring the
/// reversal rule. `from` may itself be occupied (e.g. the head).
pub fn shortest_distance(game_state: &GameState, from: Position, to: Position) -> Option<usize> {
    let blocked = BlockedCells::new(game_state);
    let mut distances = vec![usize::MAX; blocked.width * blocked.height];
    let start = blocked.index(&from)?;
    distances[start] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(pos) = queue.pop_front() {
        let distance = distances[blocked.index(&pos)?];
        if pos == to {
            return Some(distance);
        }
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if blocked.is_blocked(&next) {
                continue;
            }
            let Some(index) = blocked.index(&next) else {
                continue;
            };
            if distances[index] == usize::MAX {
                distances[index] = distance + 1;
                queue.push_back(next);
            }
        }
    }

    None
}

fn path_to_food(
    blocked: &BlockedCells,
    start: Position,
    target: Position,
    current_direction: Direction,
) -> Option<Direction> {
    if start == target {
        return None;
    }

    let mut visited = vec![false; blocked.width * blocked.height];
    if let Some(index) = blocked.index(&start) {
        visited[index] = true;
    }

    let mut queue: VecDeque<(Position, Option<Direction>)> = VecDeque::new();
    queue.push_back((start, None));

    while let Some((pos, first_move)) = queue.pop_front() {
        if pos == target {
            return first_move;
        }

        for direction in Direction::ALL {
            // Only the very first step is bound by the reversal rule.
            if first_move.is_none() && current_direction.is_opposite(&direction) {
                continue;
            }

            let next = pos.step(direction);
            if blocked.is_blocked(&next) {
                continue;
            }
            let Some(index) = blocked.index(&next) else {
                continue;
            };
            if visited[index] {
                continue;
            }

            visited[index] = true;
            queue.push_back((next, first_move.or(Some(direction))));
        }
    }

    None
}

fn flood_fill(blocked: &BlockedCells, start: Position) -> usize {
    let mut visited = vec![false; blocked.width * blocked.height];
    let Some(start_index) = blocked.index(&start) else {
        return 0;
    };
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut count = 0;

    while let Some(pos) = queue.pop_front() {
        count += 1;
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if blocked.is_blocked(&next) {
                continue;
            }
            let Some(index) = blocked.index(&next) else {
                continue;
            };
            if !visited[index] {
                visited[index] = true;
                queue.push_back(next);
            }
        }
    }

    count
}

/// Dense mask of out-of-play cells: obstacles and every snake segment. The
/// tail counts as blocked even though it vacates on the next move.
struct BlockedCells {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl BlockedCells {
    fn new(game_state: &GameState) -> Self {
        let width = game_state.grid.width as usize;
        let height = game_state.grid.height as usize;
        let mut mask = BlockedCells {
            width,
            height,
            cells: vec![false; width * height],
        };
        for pos in game_state.obstacles.iter().chain(game_state.snake.segments()) {
            if let Some(index) = mask.index(pos) {
                mask.cells[index] = true;
            }
        }
        mask
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    fn is_blocked(&self, pos: &Position) -> bool {
        self.index(pos).is_none_or(|index| self.cells[index])
    }
}
