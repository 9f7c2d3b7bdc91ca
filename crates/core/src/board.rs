//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

/// Result of [`Board::clear_lines`]: the collapsed board and the rows that were removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    pub board: Board,
    /// Indices (in the input board) of removed rows, bottom to top
    pub cleared_rows: ArrayVec<usize, HEIGHT>,
}

impl LineClear {
    pub fn count(&self) -> usize {
        self.cleared_rows.len()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Cells of row `y`; empty slice if out of range
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= HEIGHT {
            return &[];
        }
        &self.cells[y * WIDTH..(y + 1) * WIDTH]
    }

    /// Rows from top to bottom, each exactly `BOARD_WIDTH` cells
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(WIDTH)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < HEIGHT && self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Check if a row has no filled cells
    pub fn is_row_empty(&self, y: usize) -> bool {
        y < HEIGHT && self.row(y).iter().all(|cell| cell.is_none())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Remove all full rows at once and collapse the rest downward.
    ///
    /// Surviving rows keep their relative order and the same number of empty rows
    /// is backfilled at the top. `self` is left untouched; the collapsed board is
    /// returned alongside the removed row indices (bottom to top).
    pub fn clear_lines(&self) -> LineClear {
        let mut cleared_rows = ArrayVec::new();
        let mut out = Board::new();
        let mut write_y = HEIGHT;

        // Two-pointer scan from the bottom; rows above write_y stay empty.
        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                out.cells[write_y * WIDTH..(write_y + 1) * WIDTH]
                    .copy_from_slice(self.row(read_y));
            }
        }

        LineClear {
            board: out,
            cleared_rows,
        }
    }

    /// Write a piece's occupied offsets into the board at (x, y).
    ///
    /// Offsets that land above the top edge are discarded. Returns false (and leaves
    /// the board untouched) if any offset is outside the walls/floor or overlaps a
    /// filled cell.
    pub fn lock_piece(
        &mut self,
        offsets: impl IntoIterator<Item = (i8, i8)>,
        x: i8,
        y: i8,
        kind: PieceKind,
    ) -> bool {
        let targets = offsets
            .into_iter()
            .map(|(dx, dy)| (x as i16 + dx as i16, y as i16 + dy as i16));

        let mut placed: ArrayVec<(i8, i8), 16> = ArrayVec::new();
        for (px, py) in targets {
            if py < 0 {
                continue;
            }
            if px < 0 || px >= BOARD_WIDTH as i16 || py >= BOARD_HEIGHT as i16 {
                return false;
            }
            let (px, py) = (px as i8, py as i8);
            if self.is_occupied(px, py) || placed.try_push((px, py)).is_err() {
                return false;
            }
        }

        for (px, py) in placed {
            self.set(px, py, Some(kind));
        }

        true
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write the grid as cell codes (0 = empty, 1..=7 = [`PieceKind::code`])
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.map_or(0, |k| k.code());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Create from a 2D vector (must be exactly 20 rows of 10 cells)
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Option<Self> {
        if cells_2d.len() != HEIGHT || cells_2d.iter().any(|row| row.len() != WIDTH) {
            return None;
        }

        let mut board = Board::new();
        for (y, row) in cells_2d.iter().enumerate() {
            board.cells[y * WIDTH..(y + 1) * WIDTH].copy_from_slice(row);
        }
        Some(board)
    }

    /// Convert to 2D vector for testing/display
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// Fill every cell of row `y` with `kind`
    pub fn fill_row(&mut self, y: usize, kind: PieceKind) {
        if y < HEIGHT {
            for cell in &mut self.cells[y * WIDTH..(y + 1) * WIDTH] {
                *cell = Some(kind);
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
