//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond naming and indexing, so they
//! can be shared by the simulation core, the game loop and any host.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity interval at speed multiplier 1.0 |
//! | `TIME_TICK_MS` | 1000 | Interval of `time:tick` notifications |
//!
//! # Scoring Constants
//!
//! `BASE_SCORES[n]` is the level-1 value of clearing `n` rows with one lock.
//! A tetris is worth 8x a single, not 4x.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::T.as_str(), "T");
//! assert_eq!(PieceKind::ALL[PieceKind::Z.index()], PieceKind::Z);
//!
//! assert_eq!(Rotation::West.next(), Rotation::North);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Gravity interval at speed multiplier 1.0 (1000ms = one row per second)
pub const BASE_DROP_MS: u32 = 1000;

/// Interval between `time:tick` notifications while playing
pub const TIME_TICK_MS: u32 = 1000;

/// Level-1 score for clearing 0..=4 rows with a single lock
pub const BASE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level unless the difficulty overrides it
pub const DEFAULT_LINES_PER_LEVEL: u32 = 10;

/// Rows a tetris clears
pub const TETRIS_LINES: usize = 4;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to uppercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Compact cell code for grids: 1..=7 (0 is reserved for empty)
    pub fn code(&self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Next state in the cyclic rotation list (clockwise)
    pub fn next(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Index into a per-kind rotation table
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Logical game commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Pause,
    Start,
    Reset,
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;
