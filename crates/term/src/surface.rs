//! Drawing surfaces.
//!
//! The game draws into a fixed logical space of 150x300 units (10x20 tiles of
//! 15 units). A [`DrawingSurface`] maps that space onto real output.
//! [`CanvasSurface`] rasterises it into a terminal [`FrameBuffer`]; each tile
//! becomes a block of whole terminal cells, twice as wide as it is tall to
//! compensate for glyph aspect ratio.

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{
    FigureColor, CANVAS_LOGICAL_HEIGHT, CANVAS_LOGICAL_WIDTH, GRID_HEIGHT, GRID_WIDTH, TILE_HEIGHT,
    TILE_WIDTH,
};

/// A 2D surface addressed in logical canvas units.
pub trait DrawingSurface {
    /// Erase the whole canvas.
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle with a palette color.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: FigureColor);

    /// Set the logical-to-device scale. Replaces the previous scale.
    fn apply_scale(&mut self, sx: f64, sy: f64);
}

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Terminal color for a palette entry.
pub fn color_rgb(color: FigureColor) -> Rgb {
    match color {
        FigureColor::Red => Rgb::new(220, 60, 60),
        FigureColor::Green => Rgb::new(90, 210, 100),
        FigureColor::Blue => Rgb::new(70, 120, 230),
        FigureColor::Orange => Rgb::new(255, 165, 0),
        FigureColor::Yellow => Rgb::new(240, 220, 80),
        FigureColor::Purple => Rgb::new(180, 100, 220),
    }
}

const TILE_GLYPH: char = '█';
const CANVAS_BG: Rgb = Rgb::new(30, 30, 40);

/// Canvas surface rasterised into a terminal framebuffer.
///
/// The canvas is centered in the viewport and framed by a one-cell border.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    fb: FrameBuffer,
    viewport: Viewport,
    scale_x: f64,
    scale_y: f64,
    /// Framebuffer position of the canvas's top-left cell (inside the border)
    origin_x: u16,
    origin_y: u16,
}

impl CanvasSurface {
    /// A surface with no size yet. Call [`adjust_size`](Self::adjust_size)
    /// before drawing.
    pub fn new() -> Self {
        Self {
            fb: FrameBuffer::new(0, 0),
            viewport: Viewport::default(),
            scale_x: 0.0,
            scale_y: 0.0,
            origin_x: 0,
            origin_y: 0,
        }
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        let mut surface = Self::new();
        surface.adjust_size(viewport);
        surface
    }

    /// Re-measure the display. Scaling is recomputed and re-applied only when
    /// the size actually changed. Returns whether it did.
    pub fn adjust_size(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.fb.resize(viewport.width, viewport.height);

        // Whole rows per tile, leaving room for the border; columns are twice
        // the rows.
        let rows_per_tile = (viewport.height.saturating_sub(2) as usize / GRID_HEIGHT)
            .min(viewport.width.saturating_sub(2) as usize / (2 * GRID_WIDTH))
            .max(1);
        let cols_per_tile = 2 * rows_per_tile;
        self.apply_scale(
            cols_per_tile as f64 / TILE_WIDTH,
            rows_per_tile as f64 / TILE_HEIGHT,
        );
        true
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Canvas size in terminal cells at the current scale.
    pub fn canvas_cells(&self) -> (u16, u16) {
        (
            (CANVAS_LOGICAL_WIDTH * self.scale_x).round() as u16,
            (CANVAS_LOGICAL_HEIGHT * self.scale_y).round() as u16,
        )
    }

    /// Framebuffer cell of the canvas's top-left corner.
    pub fn origin(&self) -> (u16, u16) {
        (self.origin_x, self.origin_y)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    fn recenter(&mut self) {
        let (w, h) = self.canvas_cells();
        self.origin_x = self.viewport.width.saturating_sub(w + 2) / 2 + 1;
        self.origin_y = self.viewport.height.saturating_sub(h + 2) / 2 + 1;
    }

    fn draw_border(&mut self) {
        let (w, h) = self.canvas_cells();
        let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let left = self.origin_x.saturating_sub(1);
        let top = self.origin_y.saturating_sub(1);
        let right = self.origin_x + w;
        let bottom = self.origin_y + h;

        self.fb.put_char(left, top, '┌', style);
        self.fb.put_char(right, top, '┐', style);
        self.fb.put_char(left, bottom, '└', style);
        self.fb.put_char(right, bottom, '┘', style);
        for x in self.origin_x..right {
            self.fb.put_char(x, top, '─', style);
            self.fb.put_char(x, bottom, '─', style);
        }
        for y in self.origin_y..bottom {
            self.fb.put_char(left, y, '│', style);
            self.fb.put_char(right, y, '│', style);
        }
    }

    /// Logical span `[start, start + len)` to a cell span clipped to
    /// `[0, limit)`.
    fn cell_span(start: f64, len: f64, scale: f64, limit: u16) -> Option<(u16, u16)> {
        let from = (start * scale).round().max(0.0);
        let to = ((start + len) * scale).round().min(limit as f64);
        (to > from).then(|| (from as u16, (to - from) as u16))
    }
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for CanvasSurface {
    fn clear(&mut self) {
        self.fb.clear(Cell::default());
        let (w, h) = self.canvas_cells();
        let bg = CellStyle::new(CANVAS_BG, CANVAS_BG);
        self.fb.fill_rect(self.origin_x, self.origin_y, w, h, ' ', bg);
        self.draw_border();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: FigureColor) {
        let (canvas_w, canvas_h) = self.canvas_cells();
        let Some((cx, cw)) = Self::cell_span(x, w, self.scale_x, canvas_w) else {
            return;
        };
        let Some((cy, ch)) = Self::cell_span(y, h, self.scale_y, canvas_h) else {
            return;
        };
        let style = CellStyle::new(color_rgb(color), CANVAS_BG);
        self.fb.fill_rect(
            self.origin_x + cx,
            self.origin_y + cy,
            cw,
            ch,
            TILE_GLYPH,
            style,
        );
    }

    fn apply_scale(&mut self, sx: f64, sy: f64) {
        self.scale_x = sx;
        self.scale_y = sy;
        self.recenter();
    }
}
