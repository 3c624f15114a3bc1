//! Hole visual state and mole placement.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Mutually exclusive visual tag for a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoleState {
    /// Empty hole.
    #[default]
    Neutral,
    /// A mole is showing and can be whacked.
    Up,
    /// Hit effect, shown briefly after a successful whack.
    Hit,
}

/// One visual slot per hole, plus the RNG that picks where the next mole
/// appears. Out-of-range indices are silent no-ops throughout.
#[derive(Debug)]
pub struct Board {
    holes: Vec<HoleState>,
    rng: SmallRng,
}

impl Board {
    /// Create a board with `hole_count` neutral holes. A seed makes mole
    /// placement reproducible; otherwise the RNG is entropy-seeded.
    #[must_use]
    pub fn new(hole_count: usize, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        Self {
            holes: vec![HoleState::Neutral; hole_count],
            rng,
        }
    }

    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    #[must_use]
    pub fn state(&self, index: usize) -> HoleState {
        self.holes.get(index).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_up(&self, index: usize) -> bool {
        self.state(index) == HoleState::Up
    }

    /// Pick a uniformly random hole, mark it up, and return its index.
    /// A board with no holes has nothing to raise and returns `None`.
    pub fn raise_random(&mut self) -> Option<usize> {
        if self.holes.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.holes.len());
        self.holes[index] = HoleState::Up;
        Some(index)
    }

    /// Whack a hole. Only an up hole reacts: it transitions to the hit
    /// effect and the call returns true. Everything else is a no-op.
    pub fn whack(&mut self, index: usize) -> bool {
        match self.holes.get_mut(index) {
            Some(hole @ HoleState::Up) => {
                *hole = HoleState::Hit;
                true
            }
            _ => false,
        }
    }

    /// Return a hole to neutral (hide a missed mole, end a hit flash).
    pub fn settle(&mut self, index: usize) {
        if let Some(hole) = self.holes.get_mut(index) {
            *hole = HoleState::Neutral;
        }
    }

    /// Reset every hole to neutral.
    pub fn clear(&mut self) {
        self.holes.fill(HoleState::Neutral);
    }
}
