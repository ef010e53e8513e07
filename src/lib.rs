//! Canvas Tetris (workspace facade crate).
//!
//! Re-exports the member crates under `canvas_tetris::{core,input,term,types}`
//! and hosts the runner's environment configuration.

pub mod config;

pub use canvas_tetris_core as core;
pub use canvas_tetris_input as input;
pub use canvas_tetris_term as term;
pub use canvas_tetris_types as types;
