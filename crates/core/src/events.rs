//! Outbound notifications for achievement, audio and UI collaborators.
//!
//! Events serialize as `{"event": "<name>", "payload": {...}}` with camelCase
//! payload fields. Durations are whole milliseconds.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum GameEvent {
    #[serde(rename = "game:started", rename_all = "camelCase")]
    GameStarted { timestamp: u64 },

    #[serde(rename = "game:paused", rename_all = "camelCase")]
    GamePaused { is_paused: bool, time_played: u64 },

    #[serde(rename = "game:over", rename_all = "camelCase")]
    GameOver {
        score: u32,
        level: u32,
        lines: u32,
        tetris_count: u32,
        time_played: u64,
    },

    #[serde(rename = "game:reset", rename_all = "camelCase")]
    GameReset { timestamp: u64 },

    #[serde(rename = "lines:cleared", rename_all = "camelCase")]
    LinesCleared {
        count: u32,
        is_tetris: bool,
        new_total: u32,
        new_level: u32,
    },

    #[serde(rename = "level:up", rename_all = "camelCase")]
    LevelUp { level: u32, previous_level: u32 },

    #[serde(rename = "combo:updated", rename_all = "camelCase")]
    ComboUpdated { combo: u32, is_reset: bool },

    #[serde(rename = "score:updated", rename_all = "camelCase")]
    ScoreUpdated { score: u32, delta: u32, level: u32 },

    #[serde(rename = "time:tick", rename_all = "camelCase")]
    TimeTick { time_played: u64 },
}

impl GameEvent {
    /// Wire name, e.g. `"lines:cleared"`
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game:started",
            GameEvent::GamePaused { .. } => "game:paused",
            GameEvent::GameOver { .. } => "game:over",
            GameEvent::GameReset { .. } => "game:reset",
            GameEvent::LinesCleared { .. } => "lines:cleared",
            GameEvent::LevelUp { .. } => "level:up",
            GameEvent::ComboUpdated { .. } => "combo:updated",
            GameEvent::ScoreUpdated { .. } => "score:updated",
            GameEvent::TimeTick { .. } => "time:tick",
        }
    }
}
