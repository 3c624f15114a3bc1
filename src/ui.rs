//! Terminal presentation: keyboard mapping and the two-panel screen.

mod input;
mod screen;

pub use input::{map_key, spawn_reader};
pub use screen::Screen;
