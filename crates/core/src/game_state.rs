//! Game state module - the falling-figure state machine
//!
//! `GameState` owns the grid, the active figure, the counters and the caches.
//! Every transition takes `&mut self`; nothing is shared or global.
//!
//! The steady state is *falling*. Each lowering step either keeps falling,
//! lands the figure (write cells, collapse full rows, spawn the next figure),
//! or, when the figure landed above the top edge, resets the whole game.
//!
//! Vertical position is stored as the distance from the grid floor in logical
//! units. The distance from the top is derived from it and the matrix height,
//! through a single-slot cache.

use std::sync::Arc;

use log::{debug, info, trace};

use crate::cache::LastCall;
use crate::figure::{FigureMatrices, FigureMatrix};
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::snapshot::{FigureSnapshot, GameSnapshot};
use crate::types::*;

/// Active falling figure. Offsets are logical canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: FigureType,
    pub color: FigureColor,
    pub rotation: Rotation,
    pub matrix: Arc<FigureMatrix>,
    /// Tile-aligned horizontal offset
    pub primary_offset_x: f64,
    /// Fine horizontal offset, added to the primary one
    pub secondary_offset_x: f64,
    /// Distance from the grid floor to the figure's bottom edge
    pub offset_from_bottom: f64,
}

impl Figure {
    /// A figure at its default spawn position: horizontally centered, one
    /// tile below the top of the grid.
    pub fn at_spawn(
        kind: FigureType,
        color: FigureColor,
        rotation: Rotation,
        matrix: Arc<FigureMatrix>,
    ) -> Self {
        let column = GRID_WIDTH.saturating_sub(matrix.width()) / 2;
        let rows_above_floor = GRID_HEIGHT as f64 - matrix.height() as f64 - 1.0;

        Self {
            kind,
            color,
            rotation,
            primary_offset_x: column as f64 * TILE_WIDTH,
            secondary_offset_x: 0.0,
            offset_from_bottom: rows_above_floor * TILE_HEIGHT,
            matrix,
        }
    }

    pub fn total_offset_x(&self) -> f64 {
        self.primary_offset_x + self.secondary_offset_x
    }
}

/// How a lowering step is requested
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lowering {
    /// Continuous gravity for a frame that lasted `delta_ms`
    Frame { delta_ms: f64 },
    /// Snap to the next tile boundary (manual lowering)
    NextTile,
}

/// Which edge of the state machine a lowering step took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerOutcome {
    /// Still in the air (possibly moved)
    Falling,
    /// Written into the grid; a new figure was spawned
    Landed { cleared_rows: u32 },
    /// Landed above the top edge; the game was reset
    Reset,
}

/// Time to fall one tile at `level`, in milliseconds.
pub fn falling_delay_ms(level: u32) -> f64 {
    let steps = level.saturating_sub(1) as f64;
    BASE_FALLING_DELAY_MS.powf(1.0 - FALLING_DELAY_DECAY * steps)
}

#[inline]
fn to_tiles(value: f64, tile: f64) -> isize {
    (value / tile).floor() as isize
}

type OffsetFromTopFn = fn(&(f64, usize)) -> f64;

fn offset_from_top(&(offset_from_bottom, matrix_height): &(f64, usize)) -> f64 {
    (GRID_HEIGHT as f64 - matrix_height as f64) * TILE_HEIGHT - offset_from_bottom
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    figure: Figure,
    collapsed_rows: u32,
    /// Soft-drop presses in the current series (reset on landing / release)
    lowering_series: u32,
    /// Set by a landing; suppresses soft drop until the key is released
    lowering_stop: bool,
    /// Monotonic episode id (increments on every loss reset)
    episode_id: u32,
    /// Last landing event (consumed by observers)
    last_event: Option<CoreEvent>,
    last_spawn_color: Option<FigureColor>,
    rng: SimpleRng,
    matrices: FigureMatrices,
    offset_from_top_cache: LastCall<(f64, usize), f64, OffsetFromTopFn>,
}

impl GameState {
    /// Create a new game with the given RNG seed. The first figure is
    /// spawned immediately.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut matrices = FigureMatrices::new();

        let kind = rng.figure_type();
        let color = rng.figure_color(None);
        let matrix = matrices.matrix(kind, Rotation::Deg0);

        Self {
            grid: Grid::new(),
            figure: Figure::at_spawn(kind, color, Rotation::Deg0, matrix),
            collapsed_rows: 0,
            lowering_series: 0,
            lowering_stop: false,
            episode_id: 0,
            last_event: None,
            last_spawn_color: Some(color),
            rng,
            matrices,
            offset_from_top_cache: LastCall::new(offset_from_top as OffsetFromTopFn),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for scripted setups (puzzles, tests).
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn collapsed_rows(&self) -> u32 {
        self.collapsed_rows
    }

    pub fn level(&self) -> u32 {
        self.collapsed_rows / ROWS_PER_LEVEL + 1
    }

    pub fn falling_delay_ms(&self) -> f64 {
        falling_delay_ms(self.level())
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn lowering_series(&self) -> u32 {
        self.lowering_series
    }

    pub fn lowering_stopped(&self) -> bool {
        self.lowering_stop
    }

    /// Take and clear the last landing / game-over event.
    pub fn take_last_event(&mut self) -> Option<CoreEvent> {
        self.last_event.take()
    }

    /// How many times the offset-from-top derivation actually ran.
    pub fn offset_from_top_computations(&self) -> usize {
        self.offset_from_top_cache.computations()
    }

    /// Distance from the top of the grid to the figure's top edge.
    /// Negative once the figure pokes out above the grid.
    pub fn offset_from_top(&mut self) -> f64 {
        let key = (self.figure.offset_from_bottom, self.figure.matrix.height());
        *self.offset_from_top_cache.call(key)
    }

    /// Grid row of the figure's top matrix row.
    pub fn figure_row(&mut self) -> isize {
        to_tiles(self.offset_from_top(), TILE_HEIGHT)
    }

    /// Grid column of the figure's left matrix column.
    pub fn figure_column(&self) -> isize {
        to_tiles(self.figure.total_offset_x(), TILE_WIDTH)
    }

    /// Render-state accessor.
    pub fn snapshot(&mut self) -> GameSnapshot {
        let y = self.offset_from_top();
        GameSnapshot {
            grid: self.grid.to_rows(),
            figure: FigureSnapshot {
                kind: self.figure.kind,
                color: self.figure.color,
                rotation: self.figure.rotation,
                matrix: Arc::clone(&self.figure.matrix),
                x: self.figure.total_offset_x(),
                y,
            },
            level: self.level(),
            collapsed_rows: self.collapsed_rows,
            episode_id: self.episode_id,
        }
    }

    /// Discard everything and start over: empty grid, zero counters, fresh
    /// figure. The episode id and RNG stream carry on.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.collapsed_rows = 0;
        self.spawn_figure();
        self.lowering_series = 0;
        self.lowering_stop = false;
    }

    /// Spawn a random figure at rotation 0°.
    pub fn spawn_figure(&mut self) {
        let kind = self.rng.figure_type();
        self.place_new_figure(kind, Rotation::Deg0);
    }

    /// Replace the active figure with a freshly spawned one of the given type
    /// and rotation. Used by scripted setups.
    pub fn respawn_as(&mut self, kind: FigureType, rotation: Rotation) {
        self.place_new_figure(kind, rotation);
    }

    fn place_new_figure(&mut self, kind: FigureType, rotation: Rotation) {
        let color = self.rng.figure_color(self.last_spawn_color);
        let matrix = self.matrices.matrix(kind, rotation);
        self.figure = Figure::at_spawn(kind, color, rotation, matrix);
        self.last_spawn_color = Some(color);
        self.lift_out_of_terrain();

        debug!(
            "spawned {} ({}) at column {}, {} above the floor",
            kind.as_str(),
            color.as_str(),
            self.figure_column(),
            self.figure.offset_from_bottom
        );
    }

    /// Raise a newly spawned figure one tile for every matrix row that would
    /// overlap occupied cells, scanning from its bottom row upwards.
    fn lift_out_of_terrain(&mut self) {
        let matrix = Arc::clone(&self.figure.matrix);
        let column = self.figure_column();

        for r in (0..matrix.height()).rev() {
            let row = self.figure_row() + r as isize;
            let overlaps = (0..matrix.width()).any(|c| {
                matrix.is_filled(r, c) && self.grid.is_occupied(row, column + c as isize)
            });
            if overlaps {
                self.figure.offset_from_bottom += TILE_HEIGHT;
            }
        }
    }

    /// Landed iff on the floor, or some column's lowest filled tile sits
    /// directly above an occupied cell.
    fn has_landed(&mut self) -> bool {
        if self.figure.offset_from_bottom == 0.0 {
            return true;
        }

        let row = self.figure_row();
        let column = self.figure_column();
        let matrix = &self.figure.matrix;

        (0..matrix.width()).any(|c| {
            matrix.lowest_filled_in_column(c).is_some_and(|r| {
                self.grid
                    .is_occupied(row + r as isize + 1, column + c as isize)
            })
        })
    }

    fn overlaps_grid(&mut self) -> bool {
        let row = self.figure_row();
        let column = self.figure_column();
        self.figure
            .matrix
            .filled_tiles()
            .any(|(r, c)| self.grid.is_occupied(row + r as isize, column + c as isize))
    }

    /// The figure is lost if it landed above the top edge or embedded in
    /// terrain it was spawned into.
    ///
    /// The overlap case also fires with the top edge at or below row 0, e.g.
    /// a spawn lifted into terrain that still overlaps. Writing such a figure
    /// would overwrite occupied cells, so it counts as a loss too.
    fn has_lost(&mut self) -> bool {
        self.offset_from_top() < 0.0 || self.overlaps_grid()
    }

    /// Advance gravity by one frame.
    pub fn tick(&mut self, delta_ms: f64) -> LowerOutcome {
        self.lower_figure(Lowering::Frame { delta_ms })
    }

    /// Manual single-tile step.
    pub fn step_to_next_tile(&mut self) -> LowerOutcome {
        self.lower_figure(Lowering::NextTile)
    }

    pub fn lower_figure(&mut self, lowering: Lowering) -> LowerOutcome {
        if !self.has_landed() {
            match lowering {
                Lowering::Frame { delta_ms } => {
                    let distance = delta_ms / self.falling_delay_ms() * TILE_HEIGHT;
                    self.fall_by(distance);
                }
                Lowering::NextTile => {
                    // Snap rather than subtract a tile: a figure between two
                    // boundaries would otherwise skip one.
                    let next_row = self.figure_row() + 1;
                    let tiles = GRID_HEIGHT as isize - next_row - self.figure.matrix.height() as isize;
                    self.figure.offset_from_bottom = (tiles as f64 * TILE_HEIGHT).max(0.0);
                }
            }
            return LowerOutcome::Falling;
        }

        if self.has_lost() {
            self.game_over();
            return LowerOutcome::Reset;
        }

        let cleared_rows = self.land();
        LowerOutcome::Landed { cleared_rows }
    }

    /// Lower the figure by `distance` units, at most one tile at a time,
    /// stopping early once it lands. The landing itself is taken on the next
    /// lowering step.
    fn fall_by(&mut self, distance: f64) {
        let mut remaining = distance.max(0.0);
        while remaining > 0.0 {
            let step = remaining.min(TILE_HEIGHT);
            remaining -= step;
            self.figure.offset_from_bottom = (self.figure.offset_from_bottom - step).max(0.0);
            if self.has_landed() {
                break;
            }
        }
    }

    fn land(&mut self) -> u32 {
        let row = self.figure_row();
        let column = self.figure_column();
        let color = self.figure.color;
        let matrix = Arc::clone(&self.figure.matrix);

        for (r, c) in matrix.filled_tiles() {
            self.grid
                .set(row + r as isize, column + c as isize, Some(color));
        }

        let spanned = (0..matrix.height())
            .rev()
            .filter_map(|r| usize::try_from(row + r as isize).ok());
        let full = self.grid.full_rows_among(spanned);
        let cleared_rows = self.grid.collapse_rows(&full) as u32;
        self.collapsed_rows += cleared_rows;

        debug!(
            "{} landed at row {}, column {}; {} row(s) collapsed, {} total",
            self.figure.kind.as_str(),
            row,
            column,
            cleared_rows,
            self.collapsed_rows
        );

        self.last_event = Some(CoreEvent::Landed { cleared_rows });
        self.spawn_figure();
        self.lowering_series = 0;
        self.lowering_stop = true;

        cleared_rows
    }

    fn game_over(&mut self) {
        info!(
            "episode {} lost with {} collapsed row(s); resetting",
            self.episode_id, self.collapsed_rows
        );
        self.last_event = Some(CoreEvent::GameOver {
            episode_id: self.episode_id,
            collapsed_rows: self.collapsed_rows,
        });
        self.episode_id = self.episode_id.wrapping_add(1);
        self.reset();
    }

    /// Whether the figure would overlap occupied cells with its left edge at
    /// `column`. A figure between two tile boundaries is checked at both.
    fn collides_at_column(&mut self, column: isize) -> bool {
        let top = self.offset_from_top();
        let first_row = to_tiles(top, TILE_HEIGHT);
        let last_row = (top / TILE_HEIGHT).ceil() as isize;
        let matrix = &self.figure.matrix;

        (first_row..=last_row).any(|row| {
            matrix
                .filled_tiles()
                .any(|(r, c)| self.grid.is_occupied(row + r as isize, column + c as isize))
        })
    }

    /// Move one tile left. The primary offset moves first; once it is at
    /// column 0 a non-zero secondary offset absorbs the move.
    pub fn move_left(&mut self) -> bool {
        let primary = to_tiles(self.figure.primary_offset_x, TILE_WIDTH) != 0;
        let secondary = to_tiles(self.figure.secondary_offset_x, TILE_WIDTH) != 0;
        if !primary && !secondary {
            return false;
        }
        if self.collides_at_column(self.figure_column() - 1) {
            return false;
        }

        if primary {
            self.figure.primary_offset_x -= TILE_WIDTH;
        } else {
            self.figure.secondary_offset_x -= TILE_WIDTH;
        }
        true
    }

    /// Move one tile right unless the figure's right edge is at the grid edge.
    pub fn move_right(&mut self) -> bool {
        let right_edge = self.figure_column() + self.figure.matrix.width() as isize;
        if right_edge >= GRID_WIDTH as isize {
            return false;
        }
        if self.collides_at_column(self.figure_column() + 1) {
            return false;
        }

        self.figure.primary_offset_x += TILE_WIDTH;
        true
    }

    /// Down key pressed (`repeat` for auto-repeat). Returns the lowering
    /// outcome when a step was taken.
    ///
    /// A landing sets a stop flag that swallows further presses until the key
    /// is released. The fifth press of a series reaches the hard-drop branch,
    /// which does nothing.
    pub fn press_down(&mut self, repeat: bool) -> Option<LowerOutcome> {
        if self.lowering_stop {
            self.lowering_series = 0;
            return None;
        }
        if !repeat {
            self.lowering_series = 0;
        }

        self.lowering_series += 1;
        if self.lowering_series == HARD_DROP_SERIES {
            trace!("soft-drop series hit {HARD_DROP_SERIES}; hard drop is not implemented");
            return None;
        }

        Some(self.step_to_next_tile())
    }

    /// Down key released.
    pub fn release_down(&mut self) {
        self.lowering_stop = false;
        self.lowering_series = 0;
    }

    /// Dispatch a key event. Unknown combinations are ignored.
    pub fn handle_key(&mut self, input: KeyInput) {
        match (input.key, input.phase) {
            (Key::ArrowLeft, KeyPhase::Press | KeyPhase::Repeat) => {
                self.move_left();
            }
            (Key::ArrowRight, KeyPhase::Press | KeyPhase::Repeat) => {
                self.move_right();
            }
            (Key::ArrowDown, KeyPhase::Press) => {
                self.press_down(false);
            }
            (Key::ArrowDown, KeyPhase::Repeat) => {
                self.press_down(true);
            }
            (Key::ArrowDown, KeyPhase::Release) => self.release_down(),
            (Key::ArrowLeft | Key::ArrowRight, KeyPhase::Release) => {}
        }
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.press_down(false).is_some(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
