pub mod board;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod runtime;
pub mod snake;
pub mod term;

pub use board::{Board, Position};
pub use error::{Error, Result};
pub use food::{FoodCatalog, FoodId, FoodInstance, FoodKind, FoodManager, FoodStatus, Look};
pub use game::{GameConfig, GameOver, GameOverCause, GameState, Snapshot, TickOutcome};
pub use snake::{Direction, Snake};
