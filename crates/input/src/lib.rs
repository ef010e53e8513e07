//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::KeyInput`] values and
//! provides an [`InputHandler`] that fills in repeat and release phases for
//! terminals that only report presses.

pub mod handler;
pub mod map;

pub use canvas_tetris_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, map_key, map_phase, should_quit};
