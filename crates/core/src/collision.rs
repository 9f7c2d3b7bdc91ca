//! Collision checks for a shape placed on the board.
//!
//! Rows above the top edge (negative y) are legal so a piece may spawn or rotate
//! partially above the visible board. The walls and floor are not.

use crate::board::Board;
use crate::pieces::Shape;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Whether `shape` with its top-left corner at (x, y) fits on `board`.
///
/// Only occupied sub-cells are checked: each must land in `0..BOARD_WIDTH`
/// horizontally, below `BOARD_HEIGHT` vertically, and on an empty cell when it is
/// inside the board.
pub fn is_valid_position(shape: Shape, x: i8, y: i8, board: &Board) -> bool {
    shape.cells().all(|(dx, dy)| {
        let bx = x as i16 + dx as i16;
        let by = y as i16 + dy as i16;

        if bx < 0 || bx >= BOARD_WIDTH as i16 || by >= BOARD_HEIGHT as i16 {
            return false;
        }

        by < 0 || !board.is_occupied(bx as i8, by as i8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::get_shape;
    use crate::types::{PieceKind, Rotation};

    #[test]
    fn empty_board_accepts_spawn_box() {
        let board = Board::new();
        let t = get_shape(PieceKind::T, Rotation::North);
        assert!(is_valid_position(t, 3, 0, &board));
    }

    #[test]
    fn rejects_walls_and_floor() {
        let board = Board::new();
        let t = get_shape(PieceKind::T, Rotation::North);

        assert!(!is_valid_position(t, -1, 0, &board));
        assert!(!is_valid_position(t, 8, 0, &board));
        // Row 1 of the matrix is filled, so y = 19 puts it at row 20.
        assert!(!is_valid_position(t, 3, 19, &board));
        assert!(is_valid_position(t, 3, 18, &board));
    }

    #[test]
    fn allows_cells_above_the_top() {
        let board = Board::new();
        let i = get_shape(PieceKind::I, Rotation::East);
        assert!(is_valid_position(i, 3, -3, &board));
    }

    #[test]
    fn empty_sub_cells_impose_no_constraint() {
        let mut board = Board::new();
        // T North leaves (0, 0) and (2, 0) empty.
        board.set(3, 5, Some(PieceKind::O));
        board.set(5, 5, Some(PieceKind::O));
        let t = get_shape(PieceKind::T, Rotation::North);
        assert!(is_valid_position(t, 3, 5, &board));

        // The I matrix column 0 is empty when vertical-right, so it may overhang the wall.
        let i = get_shape(PieceKind::I, Rotation::East);
        assert!(is_valid_position(i, -2, 0, &board));
    }

    #[test]
    fn rejects_overlap() {
        let mut board = Board::new();
        board.set(4, 6, Some(PieceKind::Z));
        let t = get_shape(PieceKind::T, Rotation::North);
        assert!(!is_valid_position(t, 3, 5, &board));
    }
}
