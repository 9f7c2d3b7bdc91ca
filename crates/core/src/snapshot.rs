//! Read-only view of the observable game state, for renderers and tooling.

use serde::Serialize;

use crate::game_state::Tetromino;
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Board cells are `0` for empty, otherwise [`PieceKind::code`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub piece_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub tetris_count: u32,
    pub combo: u32,
    /// Milliseconds
    pub time_played: u64,
    pub speed_multiplier: f64,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_game_over: bool,
}

impl GameSnapshot {
    /// Whether commands would currently be applied
    pub fn playable(&self) -> bool {
        self.is_playing && !self.is_paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            piece_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            tetris_count: 0,
            combo: 0,
            time_played: 0,
            speed_multiplier: 1.0,
            is_playing: false,
            is_paused: false,
            is_game_over: false,
        }
    }
}
