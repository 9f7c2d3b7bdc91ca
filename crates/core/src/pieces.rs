//! Pieces module - Tetromino shape matrices
//!
//! Every kind has four rotation states, each a square matrix of occupied sub-cells.
//! The geometry follows the SRS spawn boxes (4x4 for I, 3x3 for JLSTZ) except O,
//! which uses a 2x2 box so it spawns centered. O's four states are identical.
//!
//! Rotation is a cyclic step through this table. There are no wall kicks: a rotated
//! matrix either fits where the piece currently sits or the rotation is rejected.

use crate::types::{PieceKind, Rotation};

/// Row-major matrix of sub-cells; non-zero means occupied
pub type ShapeRows = &'static [&'static [u8]];

/// Immutable shape matrix for one rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: ShapeRows,
}

impl Shape {
    pub const fn new(rows: ShapeRows) -> Self {
        Self { rows }
    }

    /// Matrix width in sub-cells
    pub fn width(&self) -> u8 {
        self.rows.first().map_or(0, |row| row.len()) as u8
    }

    /// Matrix height in sub-cells
    pub fn height(&self) -> u8 {
        self.rows.len() as u8
    }

    pub fn rows(&self) -> ShapeRows {
        self.rows
    }

    /// Whether the sub-cell at (col, row) is occupied
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .is_some_and(|&c| c != 0)
    }

    /// Offsets (dx, dy) of the occupied sub-cells, row by row
    pub fn cells(self) -> impl Iterator<Item = (i8, i8)> {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &c)| c != 0)
                .map(move |(dx, _)| (dx as i8, dy as i8))
        })
    }

    /// Columns spanned by occupied sub-cells, as (min_dx, max_dx)
    pub fn column_span(self) -> (i8, i8) {
        self.cells()
            .fold((i8::MAX, i8::MIN), |(lo, hi), (dx, _)| (lo.min(dx), hi.max(dx)))
    }
}

/// Get the shape matrix for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> Shape {
    SHAPES[kind.index()][rotation.index()]
}

/// Get initial shape for a new piece
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, Rotation::North)
}

/// Shape table indexed by [`PieceKind::index`] then [`Rotation::index`]
static SHAPES: [[Shape; 4]; 7] = [
    // I
    [
        Shape::new(&[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
        Shape::new(&[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]]),
        Shape::new(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]]),
        Shape::new(&[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]]),
    ],
    // O
    [
        Shape::new(&[&[1, 1], &[1, 1]]),
        Shape::new(&[&[1, 1], &[1, 1]]),
        Shape::new(&[&[1, 1], &[1, 1]]),
        Shape::new(&[&[1, 1], &[1, 1]]),
    ],
    // T
    [
        Shape::new(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
        Shape::new(&[&[0, 1, 0], &[0, 1, 1], &[0, 1, 0]]),
        Shape::new(&[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]]),
        Shape::new(&[&[0, 1, 0], &[1, 1, 0], &[0, 1, 0]]),
    ],
    // S
    [
        Shape::new(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
        Shape::new(&[&[0, 1, 0], &[0, 1, 1], &[0, 0, 1]]),
        Shape::new(&[&[0, 0, 0], &[0, 1, 1], &[1, 1, 0]]),
        Shape::new(&[&[1, 0, 0], &[1, 1, 0], &[0, 1, 0]]),
    ],
    // Z
    [
        Shape::new(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
        Shape::new(&[&[0, 0, 1], &[0, 1, 1], &[0, 1, 0]]),
        Shape::new(&[&[0, 0, 0], &[1, 1, 0], &[0, 1, 1]]),
        Shape::new(&[&[0, 1, 0], &[1, 1, 0], &[1, 0, 0]]),
    ],
    // J
    [
        Shape::new(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
        Shape::new(&[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]]),
        Shape::new(&[&[0, 0, 0], &[1, 1, 1], &[0, 0, 1]]),
        Shape::new(&[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]]),
    ],
    // L
    [
        Shape::new(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        Shape::new(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]]),
        Shape::new(&[&[0, 0, 0], &[1, 1, 1], &[1, 0, 0]]),
        Shape::new(&[&[1, 1, 0], &[0, 1, 0], &[0, 1, 0]]),
    ],
];
