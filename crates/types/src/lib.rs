//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no behaviour beyond small conversions, making
//! them usable from the engine, the terminal front-end and tests alike.
//!
//! # Coordinates
//!
//! The board is origin-centred with `y` growing upward. A board of width `w`
//! and height `h` spans `[-w/2, -w/2 + w) × [-h/2, -h/2 + h)`:
//!
//! - **Default size**: 10 columns × 20 rows, `x ∈ [-5, 5)`, `y ∈ [-10, 10)`
//! - **Spawn position**: `(-1, 8)`
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Front-end frame interval (~60 FPS) |
//! | `INITIAL_STEP_DELAY_MS` | 1000 | Gravity interval before any clear |
//! | `MIN_STEP_DELAY_MS` | 100 | Gravity interval at peak difficulty |
//! | `LOCK_DELAY_MS` | 500 | Idle time before a resting piece locks |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Bounds, GameAction, GridCoord, PieceKind};
//!
//! let bounds = Bounds::centered(10, 20);
//! assert_eq!(bounds.x_min(), -5);
//! assert_eq!(bounds.y_max(), 10);
//! assert!(bounds.contains(GridCoord::new(4, -10)));
//! assert!(!bounds.contains(GridCoord::new(5, 0)));
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! ```

use std::ops::{Add, AddAssign};

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u16 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Default spawn position for new pieces.
pub const SPAWN_POSITION: GridCoord = GridCoord::new(-1, 8);

/// Front-end frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at the start of a session (1 second per row)
pub const INITIAL_STEP_DELAY_MS: u32 = 1000;

/// Gravity interval once the difficulty ramp is exhausted
pub const MIN_STEP_DELAY_MS: u32 = 100;

/// Idle time a piece must accumulate before a failed step locks it
pub const LOCK_DELAY_MS: u32 = 500;

/// Clear events needed to reach peak difficulty at level 1
pub const LINES_MAX: u32 = 200;

/// Music tempo multiplier before any clear
pub const MIN_TEMPO: f32 = 0.75;

/// Music tempo multiplier at peak difficulty
pub const MAX_TEMPO: f32 = 2.0;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N rows in one lock:
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Integer board coordinate, origin-centred, `y` up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One row down.
    pub const DOWN: GridCoord = GridCoord::new(0, -1);
    pub const LEFT: GridCoord = GridCoord::new(-1, 0);
    pub const RIGHT: GridCoord = GridCoord::new(1, 0);
}

impl Add for GridCoord {
    type Output = GridCoord;

    fn add(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GridCoord {
    fn add_assign(&mut self, rhs: GridCoord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Playable rectangle. Minimums are inclusive, maximums exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    origin: GridCoord,
    width: u16,
    height: u16,
}

impl Bounds {
    /// Rectangle of the given size centred on the origin.
    pub fn centered(width: u16, height: u16) -> Self {
        Self {
            origin: GridCoord::new(-(width as i32) / 2, -(height as i32) / 2),
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn x_min(&self) -> i32 {
        self.origin.x
    }

    pub fn x_max(&self) -> i32 {
        self.origin.x + self.width as i32
    }

    pub fn y_min(&self) -> i32 {
        self.origin.y
    }

    pub fn y_max(&self) -> i32 {
        self.origin.y + self.height as i32
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.x_min() && c.x < self.x_max() && c.y >= self.y_min() && c.y < self.y_max()
    }

    /// Number of cells inside the rectangle.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::centered(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

/// The seven tetromino piece kinds
///
/// Declaration order is the index used by random piece selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Kind at `index` in [`PieceKind::ALL`], wrapping out-of-range indices.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Occupancy marker stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Cell left behind by a locked piece.
    Piece(PieceKind),
    /// Neutral block seeded by the random-start option.
    Blank,
}

/// A grid cell: `None` is empty.
pub type Cell = Option<Tile>;

/// Value pushed to a render surface for one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderTile {
    #[default]
    Empty,
    Tile(Tile),
    Ghost,
}

impl From<Cell> for RenderTile {
    fn from(cell: Cell) -> Self {
        match cell {
            Some(tile) => RenderTile::Tile(tile),
            None => RenderTile::Empty,
        }
    }
}

/// Discrete input events; at most one is consumed per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Drop to the lowest valid row and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateccw"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
        }
    }
}
