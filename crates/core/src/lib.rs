//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has no dependencies on rendering, input devices, networking, or I/O:
//!
//! - **Deterministic**: Same seed and clock produce identical games
//! - **Testable**: Time comes from a [`Clock`], pieces from a [`PieceSampler`]
//! - **Portable**: Any host can drive it (the `blockfall-engine` loop, tests, benches)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 game board with row predicates and non-mutating line clearing
//! - [`pieces`]: Tetromino shape matrices for every rotation state
//! - [`collision`]: Position validity checks for a shape against the board
//! - [`rng`]: Seeded RNG and the pluggable piece samplers
//! - [`spawner`]: Piece selection and spawn placement
//! - [`scoring`]: Line-clear scoring, leveling, combo and gravity interval
//! - [`clock`]: Clocks and the pause-aware play-time tracker
//! - [`config`]: Difficulty configuration consumed at spawn/scoring time
//! - [`events`]: Outbound notifications for collaborators
//! - [`game_state`]: The owned aggregate and its playing/paused/game-over state machine
//! - [`snapshot`]: Read-only, serializable view of the observable state
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use blockfall_core::{DifficultyConfig, FixedSequence, GameState, ManualClock};
//! use blockfall_core::types::PieceKind;
//!
//! let clock = Arc::new(ManualClock::new());
//! let sampler = FixedSequence::new(vec![PieceKind::T, PieceKind::I]);
//! let mut game = GameState::new(DifficultyConfig::default(), Box::new(sampler), clock);
//!
//! game.start_game();
//! assert!(game.is_playing());
//!
//! game.move_piece(-1, 0);
//! game.rotate_piece();
//! game.drop_piece();
//! game.tick(); // the piece can't fall further, so it locks
//!
//! assert_eq!(game.active().map(|p| p.kind), Some(PieceKind::I));
//! ```

pub mod board;
pub mod clock;
pub mod collision;
pub mod config;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod spawner;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LineClear};
pub use clock::{Clock, ManualClock, SystemClock, TimeTracker};
pub use collision::is_valid_position;
pub use config::{ConfigError, DifficultyConfig, PieceWeights, Randomizer};
pub use events::GameEvent;
pub use game_state::{build_sampler, GameState, Phase, Tetromino, TickOutcome};
pub use pieces::{get_shape, Shape};
pub use rng::{FixedSequence, PieceSampler, SevenBag, SimpleRng, WeightedSampler};
pub use scoring::{calculate_level, gravity_interval_ms, line_clear_score, Progress, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use spawner::{spawn_position, PieceSpawner};
