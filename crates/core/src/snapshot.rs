use std::sync::Arc;

use crate::figure::FigureMatrix;
use crate::types::{Cell, FigureColor, FigureType, Rotation, GRID_HEIGHT, GRID_WIDTH};

/// Render-facing view of the active figure. Positions are logical canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSnapshot {
    pub kind: FigureType,
    pub color: FigureColor,
    pub rotation: Rotation,
    pub matrix: Arc<FigureMatrix>,
    /// Left edge (primary + secondary horizontal offset)
    pub x: f64,
    /// Top edge (offset from the top of the grid)
    pub y: f64,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub grid: [[Cell; GRID_WIDTH]; GRID_HEIGHT],
    pub figure: FigureSnapshot,
    pub level: u32,
    pub collapsed_rows: u32,
    pub episode_id: u32,
}

impl GameSnapshot {
    /// Occupied grid cells as (row, col, color), top row first.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, FigureColor)> + '_ {
        self.grid.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.map(|color| (r, c, color)))
        })
    }
}
