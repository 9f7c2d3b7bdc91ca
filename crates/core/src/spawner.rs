//! Piece spawner - selects upcoming kinds and places them at the top of the board

use tracing::trace;

use crate::config::PieceWeights;
use crate::pieces::get_spawn_shape;
use crate::rng::PieceSampler;
use crate::types::{PieceKind, BOARD_WIDTH};

/// Spawn position for a kind: horizontally centered box, top row 0.
///
/// Shapes with an empty leading row (I) show their blocks at y = 1 while the
/// bounding box itself starts at 0.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let width = get_spawn_shape(kind).width();
    (((BOARD_WIDTH - width) / 2) as i8, 0)
}

/// Owns the sampling strategy used to pick each new piece
#[derive(Debug)]
pub struct PieceSpawner {
    sampler: Box<dyn PieceSampler>,
}

impl PieceSpawner {
    pub fn new(sampler: Box<dyn PieceSampler>) -> Self {
        Self { sampler }
    }

    /// Draw the next kind using the weights current at call time
    pub fn draw(&mut self, weights: &PieceWeights) -> PieceKind {
        let kind = self.sampler.draw(weights);
        trace!(kind = kind.as_str(), "drew piece");
        kind
    }

    /// Swap in a different sampling strategy
    pub fn set_sampler(&mut self, sampler: Box<dyn PieceSampler>) {
        self.sampler = sampler;
    }
}
