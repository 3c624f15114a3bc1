//! Game state, board, and session loop.

mod board;
mod runner;
mod store;
mod summary;

pub use board::HoleState;
pub use runner::{GameConfig, GameEvent, GameRunner, Render};
pub use store::GameStore;
pub use summary::GameSummary;
