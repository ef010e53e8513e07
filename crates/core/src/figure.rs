//! Figure module - tetromino occupancy matrices
//!
//! A matrix is a pure function of (type, rotation). The rotation set is
//! {0°, 45°, 90°, 135°} and each angle is a fixed transform of the 0° matrix:
//!
//! | Rotation | Square (O) | LineLike (I, S, Z) | General (T, J, L) |
//! |----------|------------|--------------------|-------------------|
//! | 0°       | identity   | identity           | identity          |
//! | 45°      | identity   | row-mirrored transpose | column-mirrored transpose |
//! | 90°      | identity   | identity           | point reflection  |
//! | 135°     | identity   | row-mirrored transpose | row-mirrored transpose |
//!
//! LineLike figures at 45° deliberately share the 135° transform.

use std::sync::Arc;

use crate::cache::MemoTable;
use crate::types::{FigureClass, FigureType, Rotation};

/// Row-major boolean occupancy pattern. Row 0 is the top of the figure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FigureMatrix {
    rows: Vec<Vec<bool>>,
}

impl FigureMatrix {
    /// Build a matrix from rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { rows }
    }

    /// Build a matrix from `#`/`.` patterns, one string per row.
    pub fn parse(rows: &[&str]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.chars().map(|ch| ch == '#').collect())
                .collect(),
        )
    }

    /// Vertical extent in tiles
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Horizontal extent in tiles
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Whether the tile at (row, col) is filled. Out of range is empty.
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Filled tiles as (row, col) pairs, top row first.
    pub fn filled_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Lowest filled row in `col`, scanning from the bottom.
    pub fn lowest_filled_in_column(&self, col: usize) -> Option<usize> {
        (0..self.height()).rev().find(|&r| self.is_filled(r, col))
    }

    /// Reverse the row order and every row's column order.
    fn point_reflected(&self) -> Self {
        Self::from_rows(
            self.rows
                .iter()
                .rev()
                .map(|row| row.iter().rev().copied().collect())
                .collect(),
        )
    }

    /// Transpose with swapped dimensions: `out[c][h - 1 - r] = in[r][c]`.
    fn transposed_mirror_columns(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let mut out = vec![vec![false; h]; w];
        for (r, c) in self.filled_tiles() {
            out[c][h - 1 - r] = true;
        }
        Self::from_rows(out)
    }

    /// Transpose with swapped dimensions: `out[w - 1 - c][r] = in[r][c]`.
    fn transposed_mirror_rows(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let mut out = vec![vec![false; h]; w];
        for (r, c) in self.filled_tiles() {
            out[w - 1 - c][r] = true;
        }
        Self::from_rows(out)
    }
}

/// Canonical 0° matrix for a figure type.
fn base_matrix(kind: FigureType) -> FigureMatrix {
    let rows: &[&str] = match kind {
        FigureType::I => &["####"],
        FigureType::O => &["##", "##"],
        FigureType::T => &[".#.", "###"],
        FigureType::S => &[".##", "##."],
        FigureType::Z => &["##.", ".##"],
        FigureType::J => &["#..", "###"],
        FigureType::L => &["..#", "###"],
    };
    FigureMatrix::parse(rows)
}

/// Compute the occupancy matrix for (type, rotation). Pure, uncached.
pub fn calculate_figure_matrix(kind: FigureType, rotation: Rotation) -> FigureMatrix {
    let base = base_matrix(kind);

    match (rotation, kind.class()) {
        (_, FigureClass::Square) | (Rotation::Deg0, _) => base,
        (Rotation::Deg90, FigureClass::LineLike) => base,
        (Rotation::Deg90, FigureClass::General) => base.point_reflected(),
        (Rotation::Deg45, FigureClass::General) => base.transposed_mirror_columns(),
        (Rotation::Deg45, FigureClass::LineLike) | (Rotation::Deg135, _) => {
            base.transposed_mirror_rows()
        }
    }
}

type MatrixFn = fn(&(FigureType, Rotation)) -> Arc<FigureMatrix>;

fn compute_shared(&(kind, rotation): &(FigureType, Rotation)) -> Arc<FigureMatrix> {
    Arc::new(calculate_figure_matrix(kind, rotation))
}

/// Memoized matrix generator. Every (type, rotation) pair is computed once and
/// shared afterwards.
#[derive(Debug, Clone)]
pub struct FigureMatrices {
    table: MemoTable<(FigureType, Rotation), Arc<FigureMatrix>, MatrixFn>,
}

impl FigureMatrices {
    pub fn new() -> Self {
        Self {
            table: MemoTable::new(compute_shared as MatrixFn),
        }
    }

    pub fn matrix(&mut self, kind: FigureType, rotation: Rotation) -> Arc<FigureMatrix> {
        Arc::clone(self.table.get((kind, rotation)))
    }

    /// Number of distinct pairs computed so far.
    pub fn computed(&self) -> usize {
        self.table.computations()
    }
}

impl Default for FigureMatrices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_matrices_have_four_tiles() {
        for kind in FigureType::ALL {
            let m = calculate_figure_matrix(kind, Rotation::Deg0);
            assert_eq!(m.filled_tiles().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_point_reflection_of_t() {
        let m = calculate_figure_matrix(FigureType::T, Rotation::Deg90);
        assert_eq!(m, FigureMatrix::parse(&["###", ".#."]));
    }

    #[test]
    fn test_lowest_filled_in_column() {
        let s = calculate_figure_matrix(FigureType::S, Rotation::Deg0);
        assert_eq!(s.lowest_filled_in_column(0), Some(1));
        assert_eq!(s.lowest_filled_in_column(1), Some(1));
        assert_eq!(s.lowest_filled_in_column(2), Some(0));
        assert_eq!(s.lowest_filled_in_column(3), None);
    }

    #[test]
    fn test_matrices_are_shared() {
        let mut matrices = FigureMatrices::new();
        let a = matrices.matrix(FigureType::L, Rotation::Deg45);
        let b = matrices.matrix(FigureType::L, Rotation::Deg45);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(matrices.computed(), 1);
    }
}
