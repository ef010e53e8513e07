//! Core types module - shared data structures and constants
//!
//! Everything here is plain data with no dependencies, so the engine, the
//! terminal renderer and the input layer can all agree on the same vocabulary.
//!
//! # Geometry
//!
//! The game lives on a fixed logical canvas of 150 x 300 units. The grid is
//! 10 columns by 20 rows, so one tile is 15 x 15 logical units. Row 0 is the
//! top of the grid. Physical pixels (or terminal cells) never reach the engine.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALLING_DELAY_MS` | 1000 | Time to fall one tile at level 1 |
//! | `FALLING_DELAY_DECAY` | 0.025 | Exponent decrement per level |
//! | `ROWS_PER_LEVEL` | 10 | Collapsed rows needed per level |
//! | `DEFAULT_FRAME_MS` | 16 | Runner frame period (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use canvas_tetris_types::{FigureType, Rotation, FigureClass, GRID_WIDTH, TILE_WIDTH};
//!
//! assert_eq!(FigureType::from_str("s"), Some(FigureType::S));
//! assert_eq!(FigureType::S.class(), FigureClass::LineLike);
//! assert_eq!(Rotation::Deg45.degrees(), 45);
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(TILE_WIDTH, 15.0);
//! ```

/// Grid width in tiles (10 columns)
pub const GRID_WIDTH: usize = 10;

/// Grid height in tiles (20 rows)
pub const GRID_HEIGHT: usize = 20;

/// Logical canvas width
pub const CANVAS_LOGICAL_WIDTH: f64 = 150.0;

/// Logical canvas height
pub const CANVAS_LOGICAL_HEIGHT: f64 = 300.0;

/// Logical width of one tile
pub const TILE_WIDTH: f64 = CANVAS_LOGICAL_WIDTH / GRID_WIDTH as f64;

/// Logical height of one tile
pub const TILE_HEIGHT: f64 = CANVAS_LOGICAL_HEIGHT / GRID_HEIGHT as f64;

/// Time needed to fall one tile at level 1 (milliseconds)
pub const BASE_FALLING_DELAY_MS: f64 = 1000.0;

/// Per-level decrement of the falling-delay exponent
pub const FALLING_DELAY_DECAY: f64 = 0.025;

/// Collapsed rows needed to advance one level
pub const ROWS_PER_LEVEL: u32 = 10;

/// Soft-drop repeat count that reaches the (unimplemented) hard-drop branch
pub const HARD_DROP_SERIES: u32 = 5;

/// Default runner frame period in milliseconds (16ms ≈ 60 FPS)
pub const DEFAULT_FRAME_MS: u64 = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_geometry_matches_canvas() {
        assert_eq!(TILE_WIDTH, 15.0);
        assert_eq!(TILE_HEIGHT, 15.0);
        assert_eq!(TILE_WIDTH * GRID_WIDTH as f64, CANVAS_LOGICAL_WIDTH);
        assert_eq!(TILE_HEIGHT * GRID_HEIGHT as f64, CANVAS_LOGICAL_HEIGHT);
    }

    #[test]
    fn figure_classes() {
        assert_eq!(FigureType::O.class(), FigureClass::Square);
        for kind in [FigureType::I, FigureType::S, FigureType::Z] {
            assert_eq!(kind.class(), FigureClass::LineLike);
        }
        for kind in [FigureType::T, FigureType::J, FigureType::L] {
            assert_eq!(kind.class(), FigureClass::General);
        }
    }

    #[test]
    fn palette_has_no_duplicates() {
        for (i, a) in FigureColor::PALETTE.iter().enumerate() {
            for b in &FigureColor::PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

/// The seven tetromino figure types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// How a figure type reacts to the rotation transforms.
///
/// - **Square**: O, every rotation is the identity
/// - **LineLike**: I, S and Z keep their 0° matrix at 90° and take the 135°
///   transpose at 45°
/// - **General**: T, J and L
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureClass {
    Square,
    LineLike,
    General,
}

impl FigureType {
    /// All figure types, in declaration order
    pub const ALL: [FigureType; 7] = [
        FigureType::I,
        FigureType::O,
        FigureType::T,
        FigureType::S,
        FigureType::Z,
        FigureType::J,
        FigureType::L,
    ];

    /// Parse figure type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use canvas_tetris_types::FigureType;
    ///
    /// assert_eq!(FigureType::from_str("i"), Some(FigureType::I));
    /// assert_eq!(FigureType::from_str("O"), Some(FigureType::O));
    /// assert_eq!(FigureType::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(FigureType::I),
            "o" => Some(FigureType::O),
            "t" => Some(FigureType::T),
            "s" => Some(FigureType::S),
            "z" => Some(FigureType::Z),
            "j" => Some(FigureType::J),
            "l" => Some(FigureType::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FigureType::I => "i",
            FigureType::O => "o",
            FigureType::T => "t",
            FigureType::S => "s",
            FigureType::Z => "z",
            FigureType::J => "j",
            FigureType::L => "l",
        }
    }

    pub fn class(&self) -> FigureClass {
        match self {
            FigureType::O => FigureClass::Square,
            FigureType::I | FigureType::S | FigureType::Z => FigureClass::LineLike,
            FigureType::T | FigureType::J | FigureType::L => FigureClass::General,
        }
    }
}

/// Figure rotation.
///
/// The set is {0°, 45°, 90°, 135°}. 45° and 135° are transposes (the matrix
/// dimensions swap), 90° is a point reflection. These are not geometric
/// rotations and must not be normalised into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg45,
        Rotation::Deg90,
        Rotation::Deg135,
    ];

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg45 => 45,
            Rotation::Deg90 => 90,
            Rotation::Deg135 => 135,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            45 => Some(Rotation::Deg45),
            90 => Some(Rotation::Deg90),
            135 => Some(Rotation::Deg135),
            _ => None,
        }
    }
}

/// Figure color, drawn from a fixed palette on every spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureColor {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    Purple,
}

impl FigureColor {
    pub const PALETTE: [FigureColor; 6] = [
        FigureColor::Red,
        FigureColor::Green,
        FigureColor::Blue,
        FigureColor::Orange,
        FigureColor::Yellow,
        FigureColor::Purple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FigureColor::Red => "red",
            FigureColor::Green => "green",
            FigureColor::Blue => "blue",
            FigureColor::Orange => "orange",
            FigureColor::Yellow => "yellow",
            FigureColor::Purple => "purple",
        }
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(FigureColor)`: Cell occupied by a landed figure of that color
pub type Cell = Option<FigureColor>;

/// Logical keys the engine reacts to. Anything else is dropped at the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowDown,
}

/// Key event phase. `Repeat` is an auto-repeat of a key that is still held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Press,
    Repeat,
    Release,
}

/// A discrete key event delivered to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub phase: KeyPhase,
}

impl KeyInput {
    pub const fn new(key: Key, phase: KeyPhase) -> Self {
        Self { key, phase }
    }

    pub const fn press(key: Key) -> Self {
        Self::new(key, KeyPhase::Press)
    }

    pub const fn repeat(key: Key) -> Self {
        Self::new(key, KeyPhase::Repeat)
    }

    pub const fn release(key: Key) -> Self {
        Self::new(key, KeyPhase::Release)
    }
}

/// Game actions that can be applied to modify game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the figure one tile left
    MoveLeft,
    /// Move the figure one tile right
    MoveRight,
    /// Step the figure down to the next tile boundary
    SoftDrop,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use canvas_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("softdrop"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("rotate"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
        }
    }
}

/// Core-side event recorded on a landing.
///
/// Observers (a score screen, logging) can poll it; the engine itself never
/// waits on it, and a loss still resets the game immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// A figure was written into the grid.
    Landed { cleared_rows: u32 },
    /// A figure landed above the top of the grid and the game was reset.
    GameOver {
        /// Id of the episode that just ended.
        episode_id: u32,
        /// Collapsed-row counter at the moment of the loss.
        collapsed_rows: u32,
    },
}
