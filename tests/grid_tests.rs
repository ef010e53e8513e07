//! Grid tests - occupancy and row compaction

use canvas_tetris::core::{Grid, SimpleRng};
use canvas_tetris::types::{Cell, FigureColor, GRID_HEIGHT, GRID_WIDTH};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new();
    assert_eq!(grid.width(), GRID_WIDTH);
    assert_eq!(grid.height(), GRID_HEIGHT);
    assert!(grid.is_empty());

    for row in 0..GRID_HEIGHT as isize {
        for col in 0..GRID_WIDTH as isize {
            assert_eq!(grid.get(row, col), Some(None));
        }
    }
}

#[test]
fn test_grid_get_out_of_bounds() {
    let grid = Grid::new();
    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, -1), None);
    assert_eq!(grid.get(GRID_HEIGHT as isize, 0), None);
    assert_eq!(grid.get(0, GRID_WIDTH as isize), None);
}

#[test]
fn test_grid_set_and_get() {
    let mut grid = Grid::new();

    assert!(grid.set(10, 5, Some(FigureColor::Purple)));
    assert_eq!(grid.get(10, 5), Some(Some(FigureColor::Purple)));
    assert!(grid.is_occupied(10, 5));

    assert!(grid.set(10, 5, None));
    assert!(!grid.is_occupied(10, 5));

    assert!(!grid.set(-1, 0, Some(FigureColor::Red)));
    assert!(!grid.set(0, GRID_WIDTH as isize, Some(FigureColor::Red)));
}

#[test]
fn test_row_full_detection() {
    let mut grid = Grid::new();
    grid.fill_row(19, FigureColor::Red, &[4]);
    assert!(!grid.is_row_full(19));
    grid.set(19, 4, Some(FigureColor::Blue));
    assert!(grid.is_row_full(19));
    assert!(!grid.is_row_full(GRID_HEIGHT));
}

fn random_grid(rng: &mut SimpleRng) -> (Grid, Vec<usize>) {
    let mut grid = Grid::new();
    let mut full = Vec::new();
    let color = FigureColor::Green;

    for row in (0..GRID_HEIGHT).rev() {
        match rng.next_range(4) {
            0 => {
                grid.fill_row(row, color, &[]);
                full.push(row);
            }
            1 => {
                let gap = rng.next_range(GRID_WIDTH as u32) as usize;
                grid.fill_row(row, color, &[gap]);
            }
            2 => {
                for col in 0..GRID_WIDTH {
                    if rng.next_range(2) == 0 {
                        grid.set(row as isize, col as isize, Some(FigureColor::PALETTE[col % 6]));
                    }
                }
                // Never accidentally full.
                grid.set(row as isize, 0, None);
            }
            _ => {}
        }
    }
    (grid, full)
}

#[test]
fn test_compaction_properties() {
    let mut rng = SimpleRng::new(2024);

    for _ in 0..200 {
        let (mut grid, full) = random_grid(&mut rng);
        // The engine never clears more than four rows at once; the grid
        // itself has no such limit.
        let before = grid.clone();
        let survivors: Vec<Vec<Cell>> = (0..GRID_HEIGHT)
            .filter(|row| !full.contains(row))
            .filter_map(|row| before.row(row).map(<[Cell]>::to_vec))
            .collect();

        let removed = grid.collapse_rows(&full);

        assert_eq!(removed, full.len());
        assert_eq!(
            grid.filled_count(),
            before.filled_count() - GRID_WIDTH * full.len()
        );

        for row in 0..full.len() {
            assert!(grid.row(row).unwrap().iter().all(Option::is_none));
        }

        let after: Vec<Vec<Cell>> = (full.len()..GRID_HEIGHT)
            .filter_map(|row| grid.row(row).map(<[Cell]>::to_vec))
            .collect();
        assert_eq!(after, survivors);
    }
}

#[test]
fn test_collapse_single_bottom_row_shifts_everything_down() {
    let mut grid = Grid::new();
    grid.fill_row(19, FigureColor::Red, &[]);
    grid.set(18, 0, Some(FigureColor::Blue));
    grid.set(0, 9, Some(FigureColor::Yellow));

    assert_eq!(grid.collapse_rows(&[19]), 1);

    assert_eq!(grid.get(19, 0), Some(Some(FigureColor::Blue)));
    assert_eq!(grid.get(1, 9), Some(Some(FigureColor::Yellow)));
    assert_eq!(grid.filled_count(), 2);
}

#[test]
fn test_full_rows_among_ignores_out_of_range() {
    let mut grid = Grid::new();
    grid.fill_row(19, FigureColor::Orange, &[]);
    let full = grid.full_rows_among([25, 19, 18]);
    assert_eq!(full.as_slice(), &[19]);
}

#[test]
fn test_to_rows_matches_cells() {
    let mut grid = Grid::new();
    grid.set(3, 7, Some(FigureColor::Red));
    let rows = grid.to_rows();
    assert_eq!(rows[3][7], Some(FigureColor::Red));
    assert_eq!(rows.iter().flatten().filter(|c| c.is_some()).count(), 1);
}
