//! Shared game state container.
//!
//! One logical session is held in a [`GameStore`] owned by the runner and
//! lent to both presentation panels. Reads are plain accessors; writes go
//! through a small set of total, unvalidated mutators.

/// Raw session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub time: i64,
    pub score: i64,
    pub game_over: bool,
    pub game_running: bool,
    pub holes: Vec<u32>,
}

impl GameState {
    /// Initial snapshot for a session with the given time limit and hole count.
    #[must_use]
    pub fn initial(time_limit: i64, hole_count: usize) -> Self {
        Self {
            time: time_limit,
            score: 0,
            game_over: false,
            game_running: false,
            holes: (1u32..).take(hole_count).collect(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial(5, 5)
    }
}

/// The live state plus the snapshot `start_game` resets to.
#[derive(Debug, Clone)]
pub struct GameStore {
    initial: GameState,
    state: GameState,
}

impl GameStore {
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            state: initial.clone(),
            initial,
        }
    }

    // Read accessors. Pass-through views of the underlying fields.

    #[must_use]
    pub const fn time(&self) -> i64 {
        self.state.time
    }

    #[must_use]
    pub const fn score(&self) -> i64 {
        self.state.score
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    #[must_use]
    pub const fn is_game_running(&self) -> bool {
        self.state.game_running
    }

    #[must_use]
    pub fn holes(&self) -> &[u32] {
        &self.state.holes
    }

    // Mutators. Each is an atomic synchronous field update with no
    // validation; all are total over integers and booleans.

    /// `time -= 1`. No floor check; the runner stops the countdown at 0.
    pub fn decrease_time(&mut self) {
        self.state.time -= 1;
    }

    /// `score += 1`, unbounded.
    pub fn increase_score(&mut self) {
        self.state.score += 1;
    }

    /// `score -= 1`, unbounded (negative scores are allowed).
    pub fn decrease_score(&mut self) {
        self.state.score -= 1;
    }

    /// Write both lifecycle flags directly. No cross-validation: callers
    /// may set any combination, including both true.
    pub fn set_game_over(&mut self, game_over: bool, game_running: bool) {
        self.state.game_over = game_over;
        self.state.game_running = game_running;
    }

    /// Reset to the initial snapshot, then mark the game as running.
    pub fn start_game(&mut self) {
        self.state = self.initial.clone();
        self.state.game_running = true;
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}
