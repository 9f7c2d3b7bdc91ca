//! Game state module - the single owned aggregate of one game session
//!
//! This module ties together all core components: board, shapes, collision,
//! spawning, scoring, and play-time tracking. It owns the lifecycle state machine:
//!
//! ```text
//! Idle --start--> Playing <--pause--> Paused
//!                    |
//!              spawn blocked
//!                    v
//!                GameOver --start--> Playing
//! ```
//!
//! Every command checks the phase itself and is a no-op when it does not apply,
//! so callers never need to gate access. Notifications are queued and drained by
//! the host with [`GameState::drain_events`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::clock::{Clock, SystemClock, TimeTracker};
use crate::collision::is_valid_position;
use crate::config::{ConfigError, DifficultyConfig, Randomizer};
use crate::events::GameEvent;
use crate::pieces::{get_shape, Shape};
use crate::rng::{PieceSampler, SevenBag, WeightedSampler};
use crate::scoring::{gravity_interval_ms, score_lock, Progress, ScoreResult};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::spawner::{spawn_position, PieceSpawner};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Column of the shape matrix's left edge
    pub x: i8,
    /// Row of the shape matrix's top edge (may be negative)
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at its spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Shape matrix for the current rotation
    pub fn shape(&self) -> Shape {
        get_shape(self.kind, self.rotation)
    }

    /// Check if the piece fits on the board where it is
    pub fn fits(&self, board: &Board) -> bool {
        is_valid_position(self.shape(), self.x, self.y, board)
    }

    /// Same piece translated by (dx, dy)
    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Same piece in its next rotation state, same position
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(),
            ..*self
        }
    }

    /// Check if the piece is resting on something
    pub fn is_grounded(&self, board: &Board) -> bool {
        !self.moved(0, 1).fits(board)
    }
}

/// Lifecycle phase; the isPlaying/isPaused/isGameOver flags derive from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// What a gravity tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, paused, or nothing to move
    Skipped,
    /// The piece fell one row
    Fell,
    /// The piece locked and the next one spawned
    Locked { lines_cleared: usize },
    /// The piece locked and the next spawn was blocked
    GameOver { lines_cleared: usize },
}

/// Build the sampler a difficulty asks for
pub fn build_sampler(randomizer: Randomizer, seed: u32) -> Box<dyn PieceSampler> {
    match randomizer {
        Randomizer::Weighted => Box::new(WeightedSampler::new(seed)),
        Randomizer::Bag => Box::new(SevenBag::new(seed)),
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    next: Option<PieceKind>,
    spawner: PieceSpawner,
    difficulty: DifficultyConfig,
    progress: Progress,
    /// User-configured gravity speed; survives `start_game`
    speed_multiplier: f64,
    phase: Phase,
    time: TimeTracker,
    clock: Arc<dyn Clock>,
    /// Monotonic id for spawned pieces (increments only on successful spawn).
    piece_id: u32,
    /// Notifications not yet drained by the host.
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(
        difficulty: DifficultyConfig,
        sampler: Box<dyn PieceSampler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            spawner: PieceSpawner::new(sampler),
            difficulty,
            progress: Progress::default(),
            speed_multiplier: 1.0,
            phase: Phase::Idle,
            time: TimeTracker::new(),
            clock,
            piece_id: 0,
            events: Vec::new(),
        }
    }

    /// Default difficulty, seeded weighted sampler, real clock
    pub fn with_seed(seed: u32) -> Self {
        let difficulty = DifficultyConfig::default();
        let sampler = build_sampler(difficulty.randomizer, seed);
        Self::new(difficulty, sampler, Arc::new(SystemClock))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a game is running, paused or not
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Whether commands and gravity currently apply
    fn can_act(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn score(&self) -> u32 {
        self.progress.score
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines
    }

    pub fn tetris_count(&self) -> u32 {
        self.progress.tetris_count
    }

    pub fn combo(&self) -> u32 {
        self.progress.combo
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn difficulty(&self) -> &DifficultyConfig {
        &self.difficulty
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Play time so far; frozen while paused or not playing
    pub fn time_played(&self) -> Duration {
        self.time.elapsed(self.clock.now())
    }

    /// Take all queued notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Direct board access for scenario setup.
    #[cfg(any(test, feature = "test-util"))]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece for scenario setup.
    #[cfg(any(test, feature = "test-util"))]
    pub fn set_active(&mut self, piece: Option<Tetromino>) {
        self.active = piece;
    }

    /// Begin a new game.
    ///
    /// Clears board, counters and flags, keeps the speed multiplier, then spawns.
    /// Play time keeps accumulating; only [`GameState::reset_game`] zeroes it.
    pub fn start_game(&mut self) {
        let now = self.clock.now();

        self.board.clear();
        self.progress = Progress::default();
        self.active = None;
        self.next = None;
        self.phase = Phase::Playing;
        self.time.start(now);

        let timestamp = self.clock.unix_millis();
        self.push(GameEvent::GameStarted { timestamp });
        info!(speed = self.speed_multiplier, "game started");

        self.spawn_piece();
    }

    /// Return to idle: everything `start_game` clears, plus play time
    pub fn reset_game(&mut self) {
        self.board.clear();
        self.progress = Progress::default();
        self.active = None;
        self.next = None;
        self.phase = Phase::Idle;
        self.time.reset();

        let timestamp = self.clock.unix_millis();
        self.push(GameEvent::GameReset { timestamp });
        info!("game reset");
    }

    /// Toggle pause. Returns false (and does nothing) unless a game is running.
    pub fn pause_game(&mut self) -> bool {
        let now = self.clock.now();
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.time.pause(now);
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                self.time.resume(now);
            }
            Phase::Idle | Phase::GameOver => return false,
        }

        let time_played = millis(self.time.elapsed(now));
        self.push(GameEvent::GamePaused {
            is_paused: self.is_paused(),
            time_played,
        });
        info!(paused = self.is_paused(), time_played, "pause toggled");
        true
    }

    /// Translate the active piece. Returns false without mutating if the game
    /// isn't running or the target position collides.
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        if !self.can_act() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let candidate = active.moved(dx, dy);
        if !candidate.fits(&self.board) {
            return false;
        }

        self.active = Some(candidate);
        true
    }

    /// Step to the next rotation state in place. No wall kicks: if the rotated
    /// shape collides where the piece sits, the rotation is dropped.
    pub fn rotate_piece(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let candidate = active.rotated();
        if !candidate.fits(&self.board) {
            return false;
        }

        self.active = Some(candidate);
        true
    }

    /// Hard drop: move down until blocked. Returns rows travelled.
    ///
    /// The piece is not locked here; the next gravity tick finds it grounded.
    pub fn drop_piece(&mut self) -> u32 {
        let mut rows = 0;
        while self.move_piece(0, 1) {
            rows += 1;
        }
        rows
    }

    /// Set the user gravity speed. Non-finite or non-positive values are rejected.
    pub fn set_speed_multiplier(&mut self, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            warn!(value, "rejected speed multiplier");
            return Err(ConfigError::InvalidSpeedMultiplier(value));
        }
        self.speed_multiplier = value;
        Ok(())
    }

    /// Replace the difficulty. Weights and multipliers apply from the next
    /// spawn/lock; the sampler kind stays the one the game was built with.
    pub fn set_difficulty(&mut self, difficulty: DifficultyConfig) -> Result<(), ConfigError> {
        difficulty.validate().inspect_err(|err| {
            warn!(error = %err, "rejected difficulty");
        })?;
        self.difficulty = difficulty;
        Ok(())
    }

    /// Swap the piece sampler (e.g. to reseed between games)
    pub fn set_sampler(&mut self, sampler: Box<dyn PieceSampler>) {
        self.spawner.set_sampler(sampler);
    }

    /// Gravity interval for the current speed settings
    pub fn gravity_interval_ms(&self, base_ms: u32) -> u32 {
        gravity_interval_ms(
            base_ms,
            self.speed_multiplier * self.difficulty.speed_multiplier,
        )
    }

    /// One gravity step: fall a row, or lock and resolve if the piece can't.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.can_act() || self.active.is_none() {
            return TickOutcome::Skipped;
        }

        if self.move_piece(0, 1) {
            return TickOutcome::Fell;
        }

        self.lock_active()
    }

    /// Lock the grounded active piece onto the board, clear lines, score, and
    /// spawn next. A piece that can still fall is left alone.
    ///
    /// The whole resolution is synchronous: clearing finishes before scoring reads
    /// the count, and scoring finishes before the spawn is attempted.
    fn lock_active(&mut self) -> TickOutcome {
        if !self.can_act() {
            return TickOutcome::Skipped;
        }
        let Some(active) = self.active else {
            return TickOutcome::Skipped;
        };
        if !active.is_grounded(&self.board) {
            return TickOutcome::Skipped;
        }
        self.active = None;

        if !self
            .board
            .lock_piece(active.shape().cells(), active.x, active.y, active.kind)
        {
            // Only reachable if the board was edited under the piece.
            debug!(kind = active.kind.as_str(), "lock rejected; piece discarded");
        }

        let clear = self.board.clear_lines();
        let lines_cleared = clear.count();
        self.board = clear.board;

        let result = score_lock(&self.progress, lines_cleared, &self.difficulty);
        self.progress = result.progress;
        debug!(
            kind = active.kind.as_str(),
            x = active.x,
            y = active.y,
            lines_cleared,
            score = self.progress.score,
            "piece locked"
        );
        self.push_lock_events(&result);

        if self.spawn_piece() {
            TickOutcome::Locked { lines_cleared }
        } else {
            TickOutcome::GameOver { lines_cleared }
        }
    }

    fn push_lock_events(&mut self, result: &ScoreResult) {
        let p = result.progress;
        if result.lines_cleared > 0 {
            self.push(GameEvent::LinesCleared {
                count: result.lines_cleared as u32,
                is_tetris: result.is_tetris(),
                new_total: p.lines,
                new_level: p.level,
            });
            if result.leveled_up() {
                self.push(GameEvent::LevelUp {
                    level: p.level,
                    previous_level: result.previous_level,
                });
            }
            self.push(GameEvent::ScoreUpdated {
                score: p.score,
                delta: result.delta,
                level: p.level,
            });
        }
        self.push(GameEvent::ComboUpdated {
            combo: p.combo,
            is_reset: result.lines_cleared == 0,
        });
    }

    /// Promote the next piece to active and draw a fresh next piece.
    /// A blocked spawn ends the game instead.
    fn spawn_piece(&mut self) -> bool {
        let weights = self.difficulty.piece_weights;
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.spawner.draw(&weights),
        };
        self.next = Some(self.spawner.draw(&weights));

        let piece = Tetromino::spawn(kind);
        if !piece.fits(&self.board) {
            self.active = None;
            self.enter_game_over();
            return false;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        debug!(kind = kind.as_str(), piece_id = self.piece_id, "spawned piece");
        true
    }

    fn enter_game_over(&mut self) {
        let now = self.clock.now();
        self.time.pause(now);
        self.phase = Phase::GameOver;

        let time_played = millis(self.time.elapsed(now));
        let p = self.progress;
        self.push(GameEvent::GameOver {
            score: p.score,
            level: p.level,
            lines: p.lines,
            tetris_count: p.tetris_count,
            time_played,
        });
        info!(score = p.score, lines = p.lines, time_played, "game over");
    }

    /// Queue a `time:tick` notification. Returns false unless actively playing.
    pub fn record_time_tick(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let time_played = millis(self.time_played());
        self.push(GameEvent::TimeTick { time_played });
        true
    }

    /// Apply a logical command
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(-1, 0),
            GameAction::MoveRight => self.move_piece(1, 0),
            GameAction::SoftDrop => self.move_piece(0, 1),
            GameAction::HardDrop => self.drop_piece() > 0,
            GameAction::Rotate => self.rotate_piece(),
            GameAction::Pause => self.pause_game(),
            GameAction::Start => {
                self.start_game();
                true
            }
            GameAction::Reset => {
                self.reset_game();
                true
            }
        }
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        self.active.is_some_and(|p| p.is_grounded(&self.board))
    }

    /// Row the active piece would land on with a hard drop
    pub fn ghost_y(&self) -> Option<i8> {
        let mut piece = self.active?;
        while piece.moved(0, 1).fits(&self.board) {
            piece = piece.moved(0, 1);
        }
        Some(piece.y)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.piece_id = self.piece_id;
        out.score = self.progress.score;
        out.level = self.progress.level;
        out.lines = self.progress.lines;
        out.tetris_count = self.progress.tetris_count;
        out.combo = self.progress.combo;
        out.time_played = millis(self.time_played());
        out.speed_multiplier = self.speed_multiplier;
        out.is_playing = self.is_playing();
        out.is_paused = self.is_paused();
        out.is_game_over = self.is_game_over();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_seed(1)
    }
}
