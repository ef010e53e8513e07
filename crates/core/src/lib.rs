//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the falling-figure game and nothing else: no
//! terminal, no clock, no global state. The host feeds it frame deltas and key
//! events and reads back a [`GameSnapshot`] to draw.
//!
//! # Module Structure
//!
//! - [`cache`]: memo table and single-slot previous-arguments cache
//! - [`figure`]: figure matrices per type and rotation
//! - [`grid`]: 10x20 occupancy grid with row collapsing
//! - [`game_state`]: the falling / landing / reset state machine
//! - [`rng`]: seeded figure type and color draws
//! - [`clock`]: frame timestamp to delta conversion
//! - [`snapshot`]: render-facing view of the state
//!
//! # Rules in brief
//!
//! - Figures fall continuously; one tile takes `1000^(1 - 0.025 * (level - 1))` ms
//! - The level is `collapsed rows / 10 + 1`
//! - Left and right move one tile; down snaps to the next tile boundary
//! - A landing writes the figure into the grid and collapses full rows
//! - Landing above the top edge resets the game
//!
//! # Example
//!
//! ```
//! use canvas_tetris_core::{FrameClock, GameState};
//! use canvas_tetris_core::types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! let mut clock = FrameClock::new();
//!
//! game.apply_action(GameAction::MoveLeft);
//! game.tick(clock.delta(0.0));
//! game.tick(clock.delta(16.0));
//!
//! let snapshot = game.snapshot();
//! assert_eq!(snapshot.level, 1);
//! assert!(snapshot.figure.y > 0.0);
//! ```

pub mod cache;
pub mod clock;
pub mod figure;
pub mod game_state;
pub mod grid;
pub mod rng;
pub mod snapshot;

pub use canvas_tetris_types as types;

// Re-export commonly used types for convenience
pub use cache::{LastCall, MemoArgs, MemoTable};
pub use clock::FrameClock;
pub use figure::{calculate_figure_matrix, FigureMatrices, FigureMatrix};
pub use game_state::{falling_delay_ms, Figure, GameState, LowerOutcome, Lowering};
pub use grid::Grid;
pub use rng::SimpleRng;
pub use snapshot::{FigureSnapshot, GameSnapshot};
