//! RNG module - seeded randomness and piece sampling strategies
//!
//! Piece selection is pluggable through [`PieceSampler`]:
//!
//! - [`WeightedSampler`]: independent draws proportional to the difficulty weights
//! - [`SevenBag`]: the "7-bag" randomizer used in modern Tetris (weights ignored)
//! - [`FixedSequence`]: a repeating fixed list, for deterministic tests
//!
//! All randomness comes from [`SimpleRng`], a small LCG, so a seed fully
//! determines the piece sequence.

use std::fmt;

use crate::config::PieceWeights;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / (1u32 << 24) as f64
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (a valid seed to resume the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Strategy that picks the next piece kind
pub trait PieceSampler: fmt::Debug + Send {
    fn draw(&mut self, weights: &PieceWeights) -> PieceKind;
}

/// Weighted independent draws. All-zero weights fall back to uniform selection.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    rng: SimpleRng,
}

impl WeightedSampler {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl PieceSampler for WeightedSampler {
    fn draw(&mut self, weights: &PieceWeights) -> PieceKind {
        let total = weights.total();
        if total <= 0.0 {
            return PieceKind::ALL[self.rng.next_range(7) as usize];
        }

        let mut roll = self.rng.next_f64() * total;
        let mut last = PieceKind::ALL[0];
        for kind in PieceKind::ALL {
            let w = weights.effective(kind);
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return kind;
            }
            roll -= w;
            last = kind;
        }

        // Float rounding can leave a sliver past the last bucket.
        last
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct SevenBag {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl SevenBag {
    /// Create a new bag generator with the given seed
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill_bag();
        bag
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl PieceSampler for SevenBag {
    fn draw(&mut self, _weights: &PieceWeights) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

/// Cycles through a fixed list of kinds
#[derive(Debug, Clone)]
pub struct FixedSequence {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl FixedSequence {
    /// An empty list behaves like a repeating `[T]`
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        let kinds = if kinds.is_empty() {
            vec![PieceKind::T]
        } else {
            kinds
        };
        Self { kinds, pos: 0 }
    }
}

impl PieceSampler for FixedSequence {
    fn draw(&mut self, _weights: &PieceWeights) -> PieceKind {
        let kind = self.kinds[self.pos % self.kinds.len()];
        self.pos += 1;
        kind
    }
}
