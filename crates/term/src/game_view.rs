//! GameView: draws a [`GameSnapshot`] onto a [`DrawingSurface`].
//!
//! This module is pure (no I/O). Each frame clears the surface, draws the
//! falling figure at its logical position, then every occupied grid tile.

use crate::core::GameSnapshot;
use crate::surface::DrawingSurface;
use crate::types::{TILE_HEIGHT, TILE_WIDTH};

/// Stateless render consumer for the game.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame.
    pub fn render<S>(&self, snapshot: &GameSnapshot, surface: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        surface.clear();

        let figure = &snapshot.figure;
        for (r, c) in figure.matrix.filled_tiles() {
            surface.fill_rect(
                figure.x + c as f64 * TILE_WIDTH,
                figure.y + r as f64 * TILE_HEIGHT,
                TILE_WIDTH,
                TILE_HEIGHT,
                figure.color,
            );
        }

        for (row, col, color) in snapshot.occupied() {
            surface.fill_rect(
                col as f64 * TILE_WIDTH,
                row as f64 * TILE_HEIGHT,
                TILE_WIDTH,
                TILE_HEIGHT,
                color,
            );
        }
    }
}
