//! Clocks and the pause-aware play-time tracker.
//!
//! Play time is always computed from timestamps (`accumulated + (now - start)`),
//! never by counting tick callbacks, so delayed or skipped ticks cannot make it drift.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of monotonic and wall-clock time
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, for event timestamps
    fn unix_millis(&self) -> u64;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    origin_unix_ms: u64,
    offset_ns: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::with_unix_origin(0)
    }

    /// Start at the given wall-clock time
    pub fn with_unix_origin(origin_unix_ms: u64) -> Self {
        Self {
            origin: Instant::now(),
            origin_unix_ms,
            offset_ns: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ns
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Time since the clock was created
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_ns.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn unix_millis(&self) -> u64 {
        self.origin_unix_ms + self.elapsed().as_millis() as u64
    }
}

/// Accumulates play time across pause/resume segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeTracker {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl TimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh running segment, folding any open one first
    pub fn start(&mut self, now: Instant) {
        self.pause(now);
        self.running_since = Some(now);
    }

    /// Fold the running segment into the accumulated total
    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    /// Start a new segment if none is running
    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Zero both the total and the running segment
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total play time as of `now`
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }
}
