//! Real-time host for a [`GameState`].
//!
//! The loop owns two periodic timers: gravity, and the `time:tick` notifier.
//! Both exist only while the game is actively playing; pausing, resetting and
//! game over release them, and every (re)start releases before arming so a
//! restart can never leave two timers running. A host calls [`GameLoop::pump`]
//! whenever [`GameLoop::next_deadline`] passes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::bus::{EventBus, EventSink, SinkId};
use crate::config::{EngineConfig, TimingConfig};
use crate::core::{
    build_sampler, Clock, ConfigError, DifficultyConfig, GameState, Phase, TickOutcome,
};
use crate::place::{apply_place, PlaceError};
use crate::types::{GameAction, Rotation};

/// Drift-free periodic deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    deadline: Instant,
}

impl IntervalTimer {
    /// First deadline one period after `now`. Zero periods are bumped to 1ms.
    pub fn start(now: Instant, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            deadline: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Fire at most once per call. Missed periods are skipped, and the deadline
    /// always advances by whole periods so it stays on the original grid.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        let behind = now.duration_since(self.deadline);
        let missed = behind.as_nanos() / self.period.as_nanos();
        let advance = u32::try_from(missed + 1).unwrap_or(u32::MAX);
        self.deadline += self.period.saturating_mul(advance);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Gravity,
    TimeTick,
}

#[derive(Debug)]
pub struct GameLoop {
    state: GameState,
    bus: EventBus,
    timing: TimingConfig,
    gravity: Option<IntervalTimer>,
    time_ticker: Option<IntervalTimer>,
    seed: Option<u32>,
}

impl GameLoop {
    pub fn new(state: GameState, timing: TimingConfig) -> Self {
        Self {
            state,
            bus: EventBus::new(),
            timing,
            gravity: None,
            time_ticker: None,
            seed: None,
        }
    }

    /// Build a game from config. Without a configured seed one is derived from
    /// the clock's wall time.
    pub fn from_config(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let seed = config.seed.unwrap_or_else(|| clock.unix_millis() as u32);
        let sampler = build_sampler(config.difficulty.randomizer, seed);
        let state = GameState::new(config.difficulty.clone(), sampler, clock);
        info!(seed, randomizer = ?config.difficulty.randomizer, "game loop created");

        let mut game_loop = Self::new(state, config.timing);
        game_loop.seed = Some(seed);
        game_loop
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    /// Seed the sampler was built with, when built from config
    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) -> SinkId {
        self.bus.subscribe(sink)
    }

    pub fn unsubscribe(&mut self, id: SinkId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn is_gravity_running(&self) -> bool {
        self.gravity.is_some()
    }

    pub fn is_time_ticker_running(&self) -> bool {
        self.time_ticker.is_some()
    }

    /// Current gravity period, if armed
    pub fn gravity_period(&self) -> Option<Duration> {
        self.gravity.map(|t| t.period())
    }

    /// Earliest armed deadline; `None` when nothing is scheduled
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.gravity, self.time_ticker) {
            (Some(g), Some(t)) => Some(g.deadline().min(t.deadline())),
            (Some(g), None) => Some(g.deadline()),
            (None, Some(t)) => Some(t.deadline()),
            (None, None) => None,
        }
    }

    pub fn start_game(&mut self) {
        self.release_timers();
        self.state.start_game();
        self.sync_timers();
        self.flush();
    }

    pub fn reset_game(&mut self) {
        self.state.reset_game();
        self.sync_timers();
        self.flush();
    }

    pub fn pause_game(&mut self) -> bool {
        let toggled = self.state.pause_game();
        if toggled {
            self.sync_timers();
            self.flush();
        }
        toggled
    }

    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        self.state.move_piece(dx, dy)
    }

    pub fn rotate_piece(&mut self) -> bool {
        self.state.rotate_piece()
    }

    pub fn drop_piece(&mut self) -> u32 {
        self.state.drop_piece()
    }

    /// Change the user speed and re-arm gravity at the new interval
    pub fn set_speed_multiplier(&mut self, value: f64) -> Result<(), ConfigError> {
        self.state.set_speed_multiplier(value)?;
        self.rearm_gravity();
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyConfig) -> Result<(), ConfigError> {
        self.state.set_difficulty(difficulty)?;
        self.rearm_gravity();
        Ok(())
    }

    /// Rotate, shift and hard drop the active piece
    pub fn place(&mut self, x: i8, rotation: Rotation) -> Result<u32, PlaceError> {
        apply_place(&mut self.state, x, rotation)
    }

    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Start => {
                self.start_game();
                true
            }
            GameAction::Reset => {
                self.reset_game();
                true
            }
            GameAction::Pause => self.pause_game(),
            other => self.state.apply_action(other),
        }
    }

    /// Fire every due timer once, in deadline order, then deliver queued events.
    /// Returns how many timers fired.
    pub fn pump(&mut self) -> usize {
        let now = self.state.clock().now();

        let order = match (self.gravity, self.time_ticker) {
            (Some(g), Some(t)) if t.deadline() < g.deadline() => {
                [TimerKind::TimeTick, TimerKind::Gravity]
            }
            _ => [TimerKind::Gravity, TimerKind::TimeTick],
        };

        let fired = order
            .into_iter()
            .filter(|&kind| self.fire_if_due(kind, now))
            .count();

        self.flush();
        fired
    }

    /// Release all timers and deliver anything still queued
    pub fn stop(&mut self) {
        self.release_timers();
        self.flush();
        info!("game loop stopped");
    }

    fn fire_if_due(&mut self, kind: TimerKind, now: Instant) -> bool {
        let timer = match kind {
            TimerKind::Gravity => self.gravity.as_mut(),
            TimerKind::TimeTick => self.time_ticker.as_mut(),
        };
        let Some(timer) = timer else {
            return false;
        };
        if !timer.poll(now) {
            return false;
        }

        match kind {
            TimerKind::Gravity => {
                if let TickOutcome::GameOver { .. } = self.state.tick() {
                    self.sync_timers();
                }
            }
            TimerKind::TimeTick => {
                self.state.record_time_tick();
            }
        }
        true
    }

    /// Arm timers while playing, release them otherwise
    fn sync_timers(&mut self) {
        if self.state.phase() != Phase::Playing {
            self.release_timers();
            return;
        }

        let now = self.state.clock().now();
        if self.gravity.is_none() {
            let period = Duration::from_millis(
                self.state.gravity_interval_ms(self.timing.base_drop_ms) as u64,
            );
            self.gravity = Some(IntervalTimer::start(now, period));
            debug!(period_ms = period.as_millis() as u64, "gravity armed");
        }
        if self.time_ticker.is_none() {
            let period = Duration::from_millis(self.timing.time_tick_ms as u64);
            self.time_ticker = Some(IntervalTimer::start(now, period));
        }
    }

    fn rearm_gravity(&mut self) {
        if self.gravity.take().is_some() {
            self.sync_timers();
        }
    }

    fn release_timers(&mut self) {
        let armed = self.gravity.is_some() || self.time_ticker.is_some();
        self.gravity = None;
        self.time_ticker = None;
        if armed {
            debug!("timers released");
        }
    }

    fn flush(&mut self) {
        for event in self.state.drain_events() {
            self.bus.publish(&event);
        }
    }
}
