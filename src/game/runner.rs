//! Game loop controller.
//!
//! Drives one session through `Idle -> Running -> Over`: a one-second
//! countdown, the repeating mole cycle, and whack handling. The state
//! transitions are plain synchronous methods on [`GameRunner`]; the async
//! [`GameRunner::run`] loop wires them to tokio timers and the input
//! channel. Everything runs on one task, so mutation order is simply the
//! order in which timers and events arrive.

use crate::game::GameSummary;
use crate::game::board::{Board, HoleState};
use crate::game::store::{GameState, GameStore};
use color_eyre::eyre::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// Countdown granularity is whole seconds.
const COUNTDOWN: Duration = Duration::from_secs(1);

/// Session parameters.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Seconds on the clock when a game starts
    pub time_limit: i64,
    /// Number of holes on the board
    pub hole_count: usize,
    /// How long a mole stays up before it counts as missed
    pub mole_interval: Duration,
    /// How long the hit effect is shown after a successful whack
    pub hit_flash: Duration,
    /// RNG seed for reproducible mole placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit: 5,
            hole_count: 5,
            mole_interval: Duration::from_millis(1000),
            hit_flash: Duration::from_millis(500),
            seed: None,
        }
    }
}

/// Input events fed to the session loop.
///
/// `Whack`, `Start` and `Quit` are the game surface; the rest are the
/// debug controls from the state panel, which mutate the shared store
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Start (or restart) the game
    Start,
    /// Whack the hole at this index
    Whack(usize),
    /// Debug: score +1
    ScoreUp,
    /// Debug: score -1
    ScoreDown,
    /// Debug: time -1
    TimeDown,
    /// End the session explicitly (`set_game_over(true, false)`)
    EndGame,
    /// Leave the game
    Quit,
}

/// Redraws a frame from the current game state.
///
/// The session loop calls this after every mutation; the terminal screen
/// implements it, and tests plug in a no-op.
pub trait Render {
    /// Draw one frame.
    ///
    /// # Errors
    /// Returns an error if writing to the output fails.
    fn draw(&mut self, game: &GameRunner) -> Result<()>;
}

/// Owns one session: the shared store, the board, and the timer state.
#[derive(Debug)]
pub struct GameRunner {
    config: GameConfig,
    store: GameStore,
    board: Board,
    /// Hole the current mole cycle raised, until its deadline fires
    active_mole: Option<usize>,
    /// Hole showing the hit effect, until the flash deadline fires
    flashing: Option<usize>,
}

impl GameRunner {
    /// Create an idle session from the given config.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            store: GameStore::new(GameState::initial(config.time_limit, config.hole_count)),
            board: Board::new(config.hole_count, config.seed),
            active_mole: None,
            flashing: None,
            config,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &GameStore {
        &self.store
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the store to its initial snapshot, clear the board, and raise
    /// the first mole. Also restarts cleanly mid-session.
    pub fn start(&mut self) {
        self.store.start_game();
        self.board.clear();
        self.flashing = None;
        self.active_mole = self.board.raise_random();
        tracing::debug!(time = self.store.time(), "Game started");
    }

    /// One countdown tick. Returns whether the countdown should stay armed;
    /// when time reaches exactly 0 the game is over and the countdown stops.
    pub fn countdown_tick(&mut self) -> bool {
        self.store.decrease_time();
        if self.store.time() == 0 {
            self.store.set_game_over(true, false);
            tracing::debug!(score = self.store.score(), "Time up");
            false
        } else {
            true
        }
    }

    /// The mole deadline fired. A mole still up was missed and costs a
    /// point. Returns whether a new mole was raised; the stop check happens
    /// here, at the firing, so a deadline already in flight when the game
    /// ends still runs once more.
    pub fn mole_timeout(&mut self) -> bool {
        if let Some(index) = self.active_mole.take() {
            if self.board.is_up(index) {
                self.store.decrease_score();
                self.board.settle(index);
                tracing::debug!(hole = index, score = self.store.score(), "Mole missed");
            }
        }
        if self.store.is_game_over() {
            false
        } else {
            self.active_mole = self.board.raise_random();
            self.active_mole.is_some()
        }
    }

    /// Whack a hole. Ignored entirely once the game is over; otherwise an
    /// up hole scores a point and starts its hit flash. Returns whether the
    /// whack connected (the caller arms the flash deadline).
    pub fn whack(&mut self, index: usize) -> bool {
        if self.store.is_game_over() {
            return false;
        }
        if !self.board.whack(index) {
            return false;
        }
        self.store.increase_score();
        // A previous flash still pending loses its timer slot; settle it now.
        if let Some(old) = self.flashing.replace(index) {
            if self.board.state(old) == HoleState::Hit {
                self.board.settle(old);
            }
        }
        tracing::debug!(hole = index, score = self.store.score(), "Whack");
        true
    }

    /// The hit flash ended; return the hole to neutral unless a new mole
    /// already took it over.
    pub fn flash_timeout(&mut self) {
        if let Some(index) = self.flashing.take() {
            if self.board.state(index) == HoleState::Hit {
                self.board.settle(index);
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.store.score(),
            time_remaining: self.store.time(),
            game_over: self.store.is_game_over(),
            holes: self.board.hole_count(),
        }
    }

    /// Run the session loop until a `Quit` event (or the input channel
    /// closing), then return the final summary.
    ///
    /// Selects over the input channel, the countdown interval, the mole
    /// deadline, and the flash deadline. Each arm runs to completion before
    /// the next fires, so no locking is needed around the shared store.
    ///
    /// # Errors
    /// Returns an error if a frame fails to draw.
    pub async fn run<R: Render>(
        &mut self,
        events: &mut mpsc::Receiver<GameEvent>,
        render: &mut R,
    ) -> Result<GameSummary> {
        let mut countdown = time::interval(COUNTDOWN);
        let mut countdown_armed = false;
        let mole = time::sleep(Duration::ZERO);
        tokio::pin!(mole);
        let mut mole_armed = false;
        let flash = time::sleep(Duration::ZERO);
        tokio::pin!(flash);
        let mut flash_armed = false;

        render.draw(self)?;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        GameEvent::Quit => break,
                        GameEvent::Start => {
                            self.start();
                            countdown = time::interval_at(Instant::now() + COUNTDOWN, COUNTDOWN);
                            countdown_armed = true;
                            mole.as_mut().reset(Instant::now() + self.config.mole_interval);
                            mole_armed = true;
                            flash_armed = false;
                        }
                        GameEvent::Whack(index) => {
                            if self.whack(index) {
                                flash.as_mut().reset(Instant::now() + self.config.hit_flash);
                                flash_armed = true;
                            }
                        }
                        GameEvent::ScoreUp => self.store.increase_score(),
                        GameEvent::ScoreDown => self.store.decrease_score(),
                        GameEvent::TimeDown => self.store.decrease_time(),
                        GameEvent::EndGame => {
                            self.store.set_game_over(true, false);
                            countdown_armed = false;
                        }
                    }
                }
                _ = countdown.tick(), if countdown_armed => {
                    countdown_armed = self.countdown_tick();
                }
                () = &mut mole, if mole_armed => {
                    mole_armed = self.mole_timeout();
                    if mole_armed {
                        mole.as_mut().reset(Instant::now() + self.config.mole_interval);
                    }
                }
                () = &mut flash, if flash_armed => {
                    self.flash_timeout();
                    flash_armed = false;
                }
            }

            render.draw(self)?;
        }

        Ok(self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullRender;

    impl Render for NullRender {
        fn draw(&mut self, _game: &GameRunner) -> Result<()> {
            Ok(())
        }
    }

    fn seeded_runner() -> GameRunner {
        GameRunner::new(GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        })
    }

    fn up_holes(runner: &GameRunner) -> Vec<usize> {
        (0..runner.board().hole_count())
            .filter(|&i| runner.board().is_up(i))
            .collect()
    }

    fn active_mole(runner: &GameRunner) -> usize {
        *up_holes(runner).first().expect("a mole should be up")
    }

    #[test]
    fn start_resets_state_and_raises_a_mole() {
        let mut runner = seeded_runner();
        runner.start();
        assert_eq!(runner.store().time(), 5);
        assert_eq!(runner.store().score(), 0);
        assert!(runner.store().is_game_running());
        assert!(!runner.store().is_game_over());
        assert_eq!(up_holes(&runner).len(), 1, "exactly one mole up after start");
    }

    #[test]
    fn five_clean_ticks_end_the_game() {
        let mut runner = seeded_runner();
        runner.start();
        for _ in 0..4 {
            assert!(runner.countdown_tick());
        }
        assert!(!runner.countdown_tick(), "fifth tick stops the countdown");
        assert_eq!(runner.store().time(), 0);
        assert!(runner.store().is_game_over());
        assert!(!runner.store().is_game_running());
        assert_eq!(runner.store().score(), 0);
    }

    #[test]
    fn one_second_game_ends_after_a_single_tick() {
        let mut runner = GameRunner::new(GameConfig {
            time_limit: 1,
            seed: Some(42),
            ..GameConfig::default()
        });
        runner.start();
        assert!(!runner.countdown_tick());
        assert_eq!(runner.store().time(), 0);
        assert!(runner.store().is_game_over());
        assert!(!runner.store().is_game_running());
    }

    #[test]
    fn missed_mole_costs_a_point_and_the_cycle_continues() {
        let mut runner = seeded_runner();
        runner.start();

        assert!(runner.mole_timeout(), "cycle re-arms while running");
        assert_eq!(runner.store().score(), -1);
        assert_eq!(up_holes(&runner).len(), 1, "next mole raised");
    }

    #[test]
    fn in_flight_mole_deadline_still_fires_once_after_game_over() {
        let mut runner = seeded_runner();
        runner.start();
        while runner.countdown_tick() {}
        assert!(runner.store().is_game_over());

        // The deadline armed before game over still runs its penalty check,
        // but does not raise another mole.
        assert!(!runner.mole_timeout());
        assert_eq!(runner.store().score(), -1);
        assert!(up_holes(&runner).is_empty());
    }

    #[test]
    fn whack_on_up_hole_scores_and_flashes() {
        let mut runner = seeded_runner();
        runner.start();
        let index = active_mole(&runner);

        assert!(runner.whack(index));
        assert_eq!(runner.store().score(), 1);
        assert_eq!(runner.board().state(index), HoleState::Hit);

        runner.flash_timeout();
        assert_eq!(runner.board().state(index), HoleState::Neutral);
    }

    #[test]
    fn whack_on_neutral_hole_never_changes_score() {
        let mut runner = seeded_runner();
        runner.start();
        let up = active_mole(&runner);
        let neutral = (0..5).find(|&i| i != up).expect("another hole");

        assert!(!runner.whack(neutral));
        assert_eq!(runner.store().score(), 0);
        assert_eq!(runner.board().state(neutral), HoleState::Neutral);
    }

    #[test]
    fn whack_after_game_over_is_a_noop() {
        let mut runner = seeded_runner();
        runner.start();
        let index = active_mole(&runner);
        while runner.countdown_tick() {}

        assert!(!runner.whack(index));
        assert_eq!(runner.store().score(), 0);
        assert_eq!(runner.board().state(index), HoleState::Up);
    }

    #[test]
    fn whacked_mole_is_not_penalized_at_its_deadline() {
        let mut runner = seeded_runner();
        runner.start();
        let index = active_mole(&runner);
        assert!(runner.whack(index));
        runner.flash_timeout();

        assert!(runner.mole_timeout());
        assert_eq!(runner.store().score(), 1, "no miss penalty after a hit");
    }

    #[test]
    fn restart_mid_session_resets_cleanly() {
        let mut runner = seeded_runner();
        runner.start();
        let index = active_mole(&runner);
        runner.whack(index);
        runner.countdown_tick();

        runner.start();
        assert_eq!(runner.store().time(), 5);
        assert_eq!(runner.store().score(), 0);
        assert_eq!(up_holes(&runner).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_loop_runs_out_the_clock() {
        let (tx, mut rx) = mpsc::channel(8);
        let driver = tokio::spawn(async move {
            tx.send(GameEvent::Start).await.ok();
            time::sleep(Duration::from_secs(7)).await;
            tx.send(GameEvent::Quit).await.ok();
        });

        let mut runner = seeded_runner();
        let summary = runner
            .run(&mut rx, &mut NullRender)
            .await
            .expect("session loop failed");

        assert_eq!(summary.time_remaining, 0);
        assert!(summary.game_over);
        assert_eq!(summary.holes, 5);
        // Every mole cycle went unwhacked, so the score can only have
        // moved down.
        assert!(summary.score <= 0);

        driver.await.expect("driver task failed");
    }

    #[tokio::test(start_paused = true)]
    async fn session_loop_idles_until_started() {
        let (tx, mut rx) = mpsc::channel(8);
        let driver = tokio::spawn(async move {
            time::sleep(Duration::from_secs(10)).await;
            tx.send(GameEvent::Quit).await.ok();
        });

        let mut runner = seeded_runner();
        let summary = runner
            .run(&mut rx, &mut NullRender)
            .await
            .expect("session loop failed");

        assert_eq!(summary.time_remaining, 5);
        assert_eq!(summary.score, 0);
        assert!(!summary.game_over);

        driver.await.expect("driver task failed");
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_stop_ends_the_session_with_time_on_the_clock() {
        let (tx, mut rx) = mpsc::channel(8);
        for event in [GameEvent::Start, GameEvent::EndGame, GameEvent::Quit] {
            tx.send(event).await.expect("send failed");
        }

        let mut runner = seeded_runner();
        let summary = runner
            .run(&mut rx, &mut NullRender)
            .await
            .expect("session loop failed");

        assert!(summary.game_over);
        assert_eq!(summary.time_remaining, 5);
        assert_eq!(summary.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn debug_events_mutate_the_shared_store() {
        let (tx, mut rx) = mpsc::channel(8);
        for event in [
            GameEvent::ScoreUp,
            GameEvent::ScoreUp,
            GameEvent::ScoreDown,
            GameEvent::TimeDown,
            GameEvent::Quit,
        ] {
            tx.send(event).await.expect("send failed");
        }

        let mut runner = seeded_runner();
        let summary = runner
            .run(&mut rx, &mut NullRender)
            .await
            .expect("session loop failed");

        assert_eq!(summary.score, 1);
        assert_eq!(summary.time_remaining, 4);
        assert!(!summary.game_over);
    }
}
