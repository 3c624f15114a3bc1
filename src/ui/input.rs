//! Keyboard handling.
//!
//! A blocking reader task turns crossterm key events into [`GameEvent`]s
//! and forwards them over the session channel. The mapping itself is a
//! pure function so it can be tested without a terminal.

use crate::game::GameEvent;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Map one key event to a game event.
///
/// Digits `1..=hole_count` whack the matching hole; `s`/Enter starts a
/// game; `q`/Esc/Ctrl-C quits. `+`, `-`, `t` and `e` are the state
/// panel's debug controls. Everything else is ignored.
#[must_use]
pub fn map_key(key: KeyEvent, hole_count: usize) -> Option<GameEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameEvent::Quit);
    }
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            (index < hole_count).then_some(GameEvent::Whack(index))
        }
        KeyCode::Char('s' | 'S') | KeyCode::Enter => Some(GameEvent::Start),
        KeyCode::Char('+' | '=') => Some(GameEvent::ScoreUp),
        KeyCode::Char('-' | '_') => Some(GameEvent::ScoreDown),
        KeyCode::Char('t' | 'T') => Some(GameEvent::TimeDown),
        KeyCode::Char('e' | 'E') => Some(GameEvent::EndGame),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(GameEvent::Quit),
        _ => None,
    }
}

/// Read terminal events on a blocking task and forward the mapped game
/// events. The task ends after forwarding `Quit` or once the receiver
/// side of the channel is gone.
pub fn spawn_reader(tx: mpsc::Sender<GameEvent>, hole_count: usize) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        loop {
            let Ok(event) = crossterm::event::read() else {
                break;
            };
            let Event::Key(key) = event else { continue };
            let Some(game_event) = map_key(key, hole_count) else {
                continue;
            };
            if tx.blocking_send(game_event).is_err() {
                break;
            }
            if game_event == GameEvent::Quit {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_map_to_hole_indices() {
        assert_eq!(
            map_key(press(KeyCode::Char('1')), 5),
            Some(GameEvent::Whack(0))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('5')), 5),
            Some(GameEvent::Whack(4))
        );
    }

    #[test]
    fn digits_beyond_the_board_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('6')), 5), None);
        assert_eq!(map_key(press(KeyCode::Char('9')), 5), None);
    }

    #[test]
    fn control_keys_map_to_lifecycle_events() {
        assert_eq!(map_key(press(KeyCode::Char('s')), 5), Some(GameEvent::Start));
        assert_eq!(map_key(press(KeyCode::Enter), 5), Some(GameEvent::Start));
        assert_eq!(map_key(press(KeyCode::Char('q')), 5), Some(GameEvent::Quit));
        assert_eq!(map_key(press(KeyCode::Esc), 5), Some(GameEvent::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), 5),
            Some(GameEvent::Quit)
        );
    }

    #[test]
    fn debug_controls_map_to_store_mutations() {
        assert_eq!(
            map_key(press(KeyCode::Char('+')), 5),
            Some(GameEvent::ScoreUp)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('-')), 5),
            Some(GameEvent::ScoreDown)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('t')), 5),
            Some(GameEvent::TimeDown)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('e')), 5),
            Some(GameEvent::EndGame)
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('x')), 5), None);
        assert_eq!(map_key(press(KeyCode::Tab), 5), None);
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            ..press(KeyCode::Char('1'))
        };
        assert_eq!(map_key(release, 5), None);
    }
}
