//! End-of-session summary.

use serde::{Deserialize, Serialize};

/// Final state of a session, reported when the player quits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Net score (hits minus misses; can be negative)
    pub score: i64,
    /// Seconds left on the countdown when the session ended
    pub time_remaining: i64,
    /// Whether the countdown ran out
    pub game_over: bool,
    /// Number of holes on the board
    pub holes: usize,
}
