//! Two-panel terminal screen.
//!
//! The board panel shows the hole row, the countdown, and the score; the
//! state panel below it is a raw readout of the same shared store with
//! its debug controls. Both panels render from the one store the runner
//! owns.

use crate::game::{GameRunner, GameStore, HoleState, Render};
use color_eyre::eyre::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use std::io::{Stdout, Write, stdout};

const fn hole_glyph(state: HoleState) -> &'static str {
    match state {
        HoleState::Neutral => "( . )",
        HoleState::Up => "(o_o)",
        HoleState::Hit => "(*!*)",
    }
}

const fn hole_color(state: HoleState) -> Color {
    match state {
        HoleState::Neutral => Color::DarkGrey,
        HoleState::Up => Color::Yellow,
        HoleState::Hit => Color::Red,
    }
}

fn status_label(store: &GameStore) -> &'static str {
    if store.is_game_over() {
        "game over"
    } else if store.is_game_running() {
        "running"
    } else {
        "press s to start"
    }
}

/// Raw-mode alternate screen. The terminal is restored on drop.
pub struct Screen {
    out: Stdout,
}

impl Screen {
    /// Switch the terminal to raw mode on the alternate screen.
    ///
    /// # Errors
    /// Returns an error if the terminal refuses raw mode or the escape
    /// sequences cannot be written.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { out })
    }

    fn draw_board_panel(&mut self, game: &GameRunner) -> Result<()> {
        let store = game.store();
        queue!(
            self.out,
            MoveTo(2, 1),
            Print("MOLEHUNT"),
            MoveTo(2, 2),
            Print(format!(
                "time: {}   score: {}   [{}]",
                store.time(),
                store.score(),
                status_label(store)
            )),
        )?;

        for (i, &id) in store.holes().iter().enumerate() {
            let col = u16::try_from(2 + i * 7).unwrap_or(u16::MAX);
            let state = game.board().state(i);
            queue!(
                self.out,
                MoveTo(col + 2, 4),
                Print(id),
                MoveTo(col, 5),
                SetForegroundColor(hole_color(state)),
                Print(hole_glyph(state)),
                ResetColor,
            )?;
        }

        queue!(
            self.out,
            MoveTo(2, 7),
            Print(format!(
                "keys: 1-{} whack   s start   q quit",
                store.holes().len()
            )),
        )?;
        Ok(())
    }

    fn draw_state_panel(&mut self, game: &GameRunner) -> Result<()> {
        let store = game.store();
        queue!(
            self.out,
            MoveTo(2, 9),
            Print("-- session state --"),
            MoveTo(2, 10),
            Print(format!(
                "time={} score={} game_running={} game_over={} holes={:?}",
                store.time(),
                store.score(),
                store.is_game_running(),
                store.is_game_over(),
                store.holes()
            )),
            MoveTo(2, 11),
            Print("debug: + score up   - score down   t time down   e end game"),
        )?;
        Ok(())
    }
}

impl Render for Screen {
    fn draw(&mut self, game: &GameRunner) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        self.draw_board_panel(game)?;
        self.draw_state_panel(game)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}
