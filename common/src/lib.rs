mod ai;
mod config;
mod constants;
mod content;
mod error;
mod game;
mod game_engine;
mod game_state;
mod grid;
mod results;
mod snake;

pub mod util;

pub use ai::*;
pub use config::*;
pub use constants::*;
pub use content::*;
pub use error::*;
pub use game::SnakeGame;
pub use game_engine::*;
pub use game_state::*;
pub use grid::*;
pub use results::*;
pub use snake::*;
pub use util::PseudoRandom;
