use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::RoundConfig;
use crate::content::ContentGenerator;
use crate::grid::Grid;
use crate::util::PseudoRandom;
use crate::{Direction, Position, Snake};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum GameCommand {
    Tick,
    Turn { direction: Direction },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Obstacle,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum GameEvent {
    SnakeTurned { direction: Direction },
    SnakeMoved { head: Position, grew: bool },
    FoodEaten { position: Position, score: u32 },
    FoodSpawned { position: Position },
    /// No free cell was left for new food.
    BoardFilled,
    SnakeDied { cause: DeathCause },
}

/// State of a single round. Mutated once per tick through `exec_command`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameState {
    pub tick: u32,
    pub grid: Grid,
    pub snake: Snake,
    pub food: Option<Position>,
    pub obstacles: BTreeSet<Position>,
    pub score: u32,
    pub config: RoundConfig,
    rng: PseudoRandom,
}

impl GameState {
    /// Starts a round: spawns the snake, then generates obstacles and food.
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self> {
        config.validate().context("Invalid round configuration")?;

        let mut rng = PseudoRandom::new(seed);
        let snake = Snake::new(config.initial_snake.iter().copied(), config.initial_direction);
        let generator = ContentGenerator::new(&config);
        let obstacles = generator
            .place_obstacles(&snake, config.obstacle_count, &mut rng)
            .context("Failed to generate obstacles")?;
        let food = generator.place_food(&snake, &obstacles, &mut rng);

        info!(
            "New round on {}x{} grid (seed {}): {} obstacles, food at {:?}",
            config.width,
            config.height,
            seed,
            obstacles.len(),
            food
        );

        Ok(GameState {
            tick: 0,
            grid: Grid::new(config.width, config.height),
            snake,
            food,
            obstacles,
            score: 0,
            config,
            rng,
        })
    }

    /// Builds a round from an explicit layout instead of generating one.
    /// Later food placements still draw from `seed`.
    pub fn with_layout(
        config: RoundConfig,
        snake: Snake,
        obstacles: BTreeSet<Position>,
        food: Option<Position>,
        seed: u64,
    ) -> Self {
        GameState {
            tick: 0,
            grid: Grid::new(config.width, config.height),
            snake,
            food,
            obstacles,
            score: 0,
            config,
            rng: PseudoRandom::new(seed),
        }
    }

    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    pub fn is_alive(&self) -> bool {
        self.snake.is_alive
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn head(&self) -> Result<&Position> {
        self.snake.head()
    }

    /// True unless `direction` would reverse the snake into itself.
    pub fn can_turn(&self, direction: Direction) -> bool {
        !self.snake.direction.is_opposite(&direction)
    }

    /// Applies one tick of movement in `direction`, subject to the reversal rule.
    pub fn step(&mut self, direction: Direction) -> Result<Vec<GameEvent>> {
        let mut out = self.exec_command(GameCommand::Turn { direction })?;
        out.extend(self.exec_command(GameCommand::Tick)?);
        Ok(out)
    }

    pub fn exec_command(&mut self, command: GameCommand) -> Result<Vec<GameEvent>> {
        let mut out: Vec<GameEvent> = Vec::new();
        if !self.snake.is_alive {
            return Ok(out);
        }

        match command {
            GameCommand::Turn { direction } => {
                if !self.can_turn(direction) {
                    debug!("Ignoring reversing turn {} while heading {}", direction, self.snake.direction);
                } else if self.snake.direction != direction {
                    self.apply_event(GameEvent::SnakeTurned { direction }, Some(&mut out));
                }
            }

            GameCommand::Tick => {
                self.tick += 1;
                let head = *self.snake.head()?;
                let new_head = head.step(self.snake.direction);

                if let Some(cause) = self.collision_at(&new_head) {
                    info!("Snake died at tick {} ({:?}) with score {}", self.tick, cause, self.score);
                    self.apply_event(GameEvent::SnakeDied { cause }, Some(&mut out));
                    return Ok(out);
                }

                let grew = self.food == Some(new_head);
                self.apply_event(GameEvent::SnakeMoved { head: new_head, grew }, Some(&mut out));
                debug_assert!(
                    self.snake.is_self_disjoint(),
                    "snake overlaps itself while alive"
                );

                if grew {
                    let score = self.score + self.config.food_reward;
                    self.apply_event(
                        GameEvent::FoodEaten {
                            position: new_head,
                            score,
                        },
                        Some(&mut out),
                    );

                    let generator = ContentGenerator::new(&self.config);
                    match generator.place_food(&self.snake, &self.obstacles, &mut self.rng) {
                        Some(position) => {
                            self.apply_event(GameEvent::FoodSpawned { position }, Some(&mut out))
                        }
                        None => self.apply_event(GameEvent::BoardFilled, Some(&mut out)),
                    }
                }
            }
        }

        Ok(out)
    }

    pub fn apply_event(&mut self, event: GameEvent, out: Option<&mut Vec<GameEvent>>) {
        if let Some(out) = out {
            out.push(event.clone());
        }

        match event {
            GameEvent::SnakeTurned { direction } => {
                self.snake.direction = direction;
            }

            GameEvent::SnakeMoved { head, grew } => {
                self.snake.body.push_front(head);
                if !grew {
                    self.snake.body.pop_back();
                }
            }

            GameEvent::FoodEaten { score, .. } => {
                self.score = score;
                self.food = None;
            }

            GameEvent::FoodSpawned { position } => {
                self.food = Some(position);
            }

            GameEvent::BoardFilled => {
                self.food = None;
            }

            GameEvent::SnakeDied { .. } => {
                self.snake.is_alive = false;
            }
        }
    }

    fn collision_at(&self, pos: &Position) -> Option<DeathCause> {
        if !self.grid.in_bounds(pos) {
            Some(DeathCause::Wall)
        } else if self.snake.contains_point(pos) {
            Some(DeathCause::SelfCollision)
        } else if self.obstacles.contains(pos) {
            Some(DeathCause::Obstacle)
        } else {
            None
        }
    }
}
