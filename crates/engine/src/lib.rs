//! Real-time host for the blockfall core.
//!
//! - [`game_loop`]: [`GameLoop`] with drift-free gravity and play-time timers
//! - [`bus`]: event fan-out to closures, channels and JSON-lines writers
//! - [`config`]: TOML engine configuration
//! - [`place`]: rotate/shift/drop planner on top of the logical commands
//! - [`autoplay`]: greedy placement policy used by the headless runner

pub mod autoplay;
pub mod bus;
pub mod config;
pub mod game_loop;
pub mod place;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use autoplay::{best_placement, Placement, Weights};
pub use bus::{EventBus, EventSink, FnSink, JsonLinesSink, SinkId};
pub use config::{EngineConfig, LoadError, TimingConfig, CONFIG_ENV_VAR};
pub use game_loop::{GameLoop, IntervalTimer};
pub use place::{apply_place, PlaceError};
