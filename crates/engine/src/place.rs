use crate::core::{GameState, Tetromino};
use crate::types::{Rotation, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    RotationBlocked,
    XOutOfBounds,
    XBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::RotationBlocked
            | PlaceError::XOutOfBounds
            | PlaceError::XBlocked
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::RotationBlocked => "could not rotate to target rotation",
            PlaceError::XOutOfBounds => "target x would place piece out of bounds",
            PlaceError::XBlocked => "could not move to target x due to collision",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
        }
    }
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Number of clockwise steps from `from` to `to`
fn rotation_steps(from: Rotation, to: Rotation) -> usize {
    (to.index() + 4 - from.index()) % 4
}

/// Bring the active piece to `target_rot` and column `target_x`, then hard drop.
///
/// The path is checked on a copy first, so a rejected placement leaves the game
/// untouched. Returns the number of rows dropped. The piece locks on the next
/// gravity tick.
pub fn apply_place(
    state: &mut GameState,
    target_x: i8,
    target_rot: Rotation,
) -> Result<u32, PlaceError> {
    if !state.is_playing() || state.is_paused() {
        return Err(PlaceError::NotPlayable);
    }

    let Some(active) = state.active() else {
        return Err(PlaceError::NoActive);
    };
    let board = state.board();

    // Rotation is one-directional and unkicked: every intermediate state must fit.
    let steps = rotation_steps(active.rotation, target_rot);
    let mut piece: Tetromino = active;
    for _ in 0..steps {
        piece = piece.rotated();
        if !piece.fits(board) {
            return Err(PlaceError::RotationBlocked);
        }
    }

    // Validate x bounds based on the rotated shape.
    let (min_dx, max_dx) = piece.shape().column_span();
    if target_x as i16 + (min_dx as i16) < 0
        || target_x as i16 + (max_dx as i16) >= BOARD_WIDTH as i16
    {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - piece.x;
    let step = dx.signum();
    for _ in 0..dx.unsigned_abs() {
        piece = piece.moved(step, 0);
        if !piece.fits(board) {
            return Err(PlaceError::XBlocked);
        }
    }

    for _ in 0..steps {
        state.rotate_piece();
    }
    for _ in 0..dx.unsigned_abs() {
        state.move_piece(step, 0);
    }
    Ok(state.drop_piece())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn started(seed: u32) -> GameState {
        let mut gs = GameState::with_seed(seed);
        gs.start_game();
        gs
    }

    #[test]
    fn rotation_steps_wrap() {
        assert_eq!(rotation_steps(Rotation::North, Rotation::North), 0);
        assert_eq!(rotation_steps(Rotation::North, Rotation::West), 3);
        assert_eq!(rotation_steps(Rotation::West, Rotation::North), 1);
        assert_eq!(rotation_steps(Rotation::South, Rotation::East), 3);
    }

    #[test]
    fn place_moves_rotates_and_drops() {
        let mut gs = started(1);
        let a = gs.active().expect("expected active piece");

        let rows = apply_place(&mut gs, 0, Rotation::East).unwrap();
        let placed = gs.active().unwrap();

        assert_eq!(placed.rotation, Rotation::East);
        assert_eq!(placed.x, 0);
        assert!(rows > 0);
        assert!(gs.is_grounded());
        assert_eq!(placed.kind, a.kind);
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut gs = started(1);
        gs.pause_game();

        let a = gs.active().expect("expected active piece");
        let err = apply_place(&mut gs, a.x, a.rotation).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_idle() {
        let mut gs = GameState::with_seed(1);
        let err = apply_place(&mut gs, 3, Rotation::North).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_x_out_of_bounds() {
        let mut gs = started(1);
        let a = gs.active().expect("expected active piece");

        let err = apply_place(&mut gs, -50, a.rotation).unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(gs.active(), Some(a));
    }

    #[test]
    fn place_rejected_when_x_blocked_by_collision() {
        let mut gs = started(1);
        let a = gs.active().expect("expected active piece");

        // Place blocking cells exactly where the piece would occupy one column left.
        for (dx, dy) in a.shape().cells() {
            let _ = gs.board_mut().set(a.x + dx - 1, a.y + dy, Some(PieceKind::I));
        }

        let err = apply_place(&mut gs, a.x - 1, a.rotation).unwrap_err();
        assert_eq!(err, PlaceError::XBlocked);
        assert_eq!(gs.active(), Some(a));
    }
}
