//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the game draws in logical canvas
//! units through [`DrawingSurface`], [`CanvasSurface`] rasterises that into a
//! [`FrameBuffer`], and [`TerminalRenderer`] flushes the framebuffer to the
//! terminal as a diff against the previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod surface;

pub use canvas_tetris_core as core;
pub use canvas_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::GameView;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use surface::{color_rgb, CanvasSurface, DrawingSurface, Viewport};
