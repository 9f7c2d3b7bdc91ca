//! Greedy placement policy for the headless runner.
//!
//! Tries every rotation and column for the active piece, drops it on a copy of
//! the board, and scores the result by cleared lines, stack height, holes and
//! surface bumpiness.

use crate::core::{Board, Tetromino};
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

const W: usize = BOARD_WIDTH as usize;
const H: usize = BOARD_HEIGHT as usize;

/// Feature weights, higher is better
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub lines: f64,
    pub aggregate_height: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            lines: 0.76,
            aggregate_height: -0.51,
            holes: -0.36,
            bumpiness: -0.18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rotation: Rotation,
    pub x: i8,
    pub score: f64,
}

/// Column height: number of rows from the bottom up to the highest filled cell.
pub fn column_height(board: &Board, x: usize) -> u32 {
    (0..H)
        .find(|&y| board.is_occupied(x as i8, y as i8))
        .map_or(0, |y| (H - y) as u32)
}

/// Empty cells with a filled cell somewhere above them in the same column.
pub fn hole_count(board: &Board) -> u32 {
    let mut holes = 0;
    for x in 0..W {
        let mut found = false;
        for y in 0..H {
            if board.is_occupied(x as i8, y as i8) {
                found = true;
            } else if found {
                holes += 1;
            }
        }
    }
    holes
}

fn evaluate(board: &Board, lines: usize, weights: &Weights) -> f64 {
    let heights: Vec<u32> = (0..W).map(|x| column_height(board, x)).collect();
    let aggregate: u32 = heights.iter().sum();
    let bumpiness: u32 = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();

    weights.lines * lines as f64
        + weights.aggregate_height * aggregate as f64
        + weights.holes * hole_count(board) as f64
        + weights.bumpiness * bumpiness as f64
}

/// Best placement for `kind` dropped straight down from its spawn row.
///
/// Returns `None` if no rotation/column combination fits at the spawn row.
pub fn best_placement(board: &Board, kind: PieceKind, weights: &Weights) -> Option<Placement> {
    let spawn = Tetromino::spawn(kind);
    let mut best: Option<Placement> = None;

    let mut rotated = spawn;
    for _ in 0..4 {
        let (min_dx, max_dx) = rotated.shape().column_span();
        for x in -min_dx..(W as i8 - max_dx) {
            let mut piece = Tetromino { x, ..rotated };
            if !piece.fits(board) {
                continue;
            }
            while piece.moved(0, 1).fits(board) {
                piece = piece.moved(0, 1);
            }

            let mut after = board.clone();
            if !after.lock_piece(piece.shape().cells(), piece.x, piece.y, kind) {
                continue;
            }
            let clear = after.clear_lines();
            let score = evaluate(&clear.board, clear.count(), weights);

            if best.map_or(true, |b| score > b.score) {
                best = Some(Placement {
                    rotation: piece.rotation,
                    x,
                    score,
                });
            }
        }
        rotated = rotated.rotated();
    }

    best
}
