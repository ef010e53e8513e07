//! Grid module - the occupancy grid landed figures are written into
//!
//! The grid is 10 columns x 20 rows stored as a flat row-major array.
//! Coordinates are (row, col) with row 0 at the top. Signed lookups treat
//! anything outside the grid as empty, so figures partly above the top edge can
//! be probed without special cases.

use arrayvec::ArrayVec;

use crate::types::{Cell, FigureColor, GRID_HEIGHT, GRID_WIDTH};

/// Total number of cells on the grid
const GRID_SIZE: usize = GRID_WIDTH * GRID_HEIGHT;

/// Upper bound on rows a single landing can complete (tallest figure matrix).
pub const MAX_CLEARED_ROWS: usize = 4;

/// The occupancy grid - 20 rows x 10 columns using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    #[inline(always)]
    fn index(row: isize, col: isize) -> Option<usize> {
        if row < 0 || col < 0 || row >= GRID_HEIGHT as isize || col >= GRID_WIDTH as isize {
            return None;
        }
        Some((row as usize) * GRID_WIDTH + (col as usize))
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    /// Get cell at (row, col). Returns None if out of bounds.
    pub fn get(&self, row: isize, col: isize) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false if out of bounds.
    pub fn set(&mut self, row: isize, col: isize, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (row, col) is inside the grid and filled.
    pub fn is_occupied(&self, row: isize, col: isize) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row)
            .map(|cells| cells.iter().all(Option::is_some))
            .unwrap_or(false)
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= GRID_HEIGHT {
            return None;
        }
        let start = row * GRID_WIDTH;
        Some(&self.cells[start..start + GRID_WIDTH])
    }

    /// Fill a whole row with one color, optionally leaving some columns empty.
    pub fn fill_row(&mut self, row: usize, color: FigureColor, gaps: &[usize]) {
        for col in 0..GRID_WIDTH {
            let cell = if gaps.contains(&col) { None } else { Some(color) };
            self.set(row as isize, col as isize, cell);
        }
    }

    /// Remove the given full rows and compact the grid.
    ///
    /// `cleared` must be sorted bottom to top (descending). Starting at the
    /// lowest cleared row and walking upwards, every surviving row is moved
    /// down by the number of cleared rows seen so far. The top `cleared.len()`
    /// rows end up empty. Returns the number of rows removed.
    pub fn collapse_rows(&mut self, cleared: &[usize]) -> usize {
        let Some(&lowest) = cleared.first() else {
            return 0;
        };
        debug_assert!(cleared.windows(2).all(|w| w[0] > w[1]));

        let width = GRID_WIDTH;
        let mut shift = 0;

        for row in (0..=lowest).rev() {
            if cleared.contains(&row) {
                shift += 1;
                continue;
            }
            if shift > 0 {
                let src = row * width;
                self.cells.copy_within(src..src + width, src + shift * width);
            }
        }

        for cell in &mut self.cells[..shift * width] {
            *cell = None;
        }

        shift
    }

    /// Scan `rows` (given bottom to top) and collect the ones that are full.
    pub fn full_rows_among(
        &self,
        rows: impl IntoIterator<Item = usize>,
    ) -> ArrayVec<usize, MAX_CLEARED_ROWS> {
        let mut full = ArrayVec::new();
        for row in rows {
            if self.is_row_full(row) && !full.contains(&row) {
                let _ = full.try_push(row);
            }
        }
        full
    }

    /// Count of filled cells on the whole grid.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid into a 2D array, top row first.
    pub fn to_rows(&self) -> [[Cell; GRID_WIDTH]; GRID_HEIGHT] {
        let mut out = [[None; GRID_WIDTH]; GRID_HEIGHT];
        for (row, chunk) in out.iter_mut().zip(self.cells.chunks_exact(GRID_WIDTH)) {
            row.copy_from_slice(chunk);
        }
        out
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(0, 9), Some(9));
        assert_eq!(Grid::index(1, 0), Some(10));
        assert_eq!(Grid::index(19, 9), Some(199));
        assert_eq!(Grid::index(-1, 0), None);
        assert_eq!(Grid::index(0, 10), None);
        assert_eq!(Grid::index(20, 0), None);
    }

    #[test]
    fn test_out_of_range_is_not_occupied() {
        let mut grid = Grid::new();
        grid.fill_row(0, FigureColor::Red, &[]);
        assert!(grid.is_occupied(0, 0));
        assert!(!grid.is_occupied(-1, 0));
        assert!(!grid.is_occupied(0, -1));
        assert!(!grid.is_occupied(20, 0));
    }

    #[test]
    fn test_collapse_non_adjacent_rows() {
        let mut grid = Grid::new();
        grid.fill_row(19, FigureColor::Red, &[]);
        grid.set(18, 0, Some(FigureColor::Blue));
        grid.fill_row(17, FigureColor::Green, &[]);
        grid.set(16, 5, Some(FigureColor::Yellow));

        let removed = grid.collapse_rows(&[19, 17]);

        assert_eq!(removed, 2);
        assert_eq!(grid.get(19, 0), Some(Some(FigureColor::Blue)));
        assert_eq!(grid.get(18, 5), Some(Some(FigureColor::Yellow)));
        assert_eq!(grid.filled_count(), 2);
        assert!(grid.row(0).unwrap().iter().all(Option::is_none));
        assert!(grid.row(1).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_collapse_nothing() {
        let mut grid = Grid::new();
        grid.set(10, 3, Some(FigureColor::Red));
        let before = grid.clone();
        assert_eq!(grid.collapse_rows(&[]), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_full_rows_among_keeps_scan_order() {
        let mut grid = Grid::new();
        grid.fill_row(19, FigureColor::Red, &[]);
        grid.fill_row(18, FigureColor::Red, &[4]);
        grid.fill_row(17, FigureColor::Red, &[]);

        let full = grid.full_rows_among([19, 18, 17, 16]);
        assert_eq!(full.as_slice(), &[19, 17]);
    }
}
