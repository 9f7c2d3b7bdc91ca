//! Property tests for board and game-state invariants.
//!
//! - Line clearing keeps board height, never mutates its input, and keeps the
//!   surviving rows in their original order.
//! - The collision check accepts a position exactly when every occupied
//!   sub-cell is in bounds and empty (cells above the top edge excepted).
//! - A rejected command leaves the observable state untouched.
//! - Counters stay monotonic and the level always matches the line total.

use proptest::prelude::*;

use blockfall::core::{calculate_level, is_valid_position, Board, GameState};
use blockfall::core::pieces::get_shape;
use blockfall::types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0usize..7).prop_map(|i| PieceKind::ALL[i])
}

fn rotation_strategy() -> impl Strategy<Value = Rotation> {
    prop_oneof![
        Just(Rotation::North),
        Just(Rotation::East),
        Just(Rotation::South),
        Just(Rotation::West),
    ]
}

/// Boards with a mix of scattered cells and completely filled rows
fn board_strategy() -> impl Strategy<Value = Board> {
    (
        prop::collection::vec((0i8..10, 0i8..20, kind_strategy()), 0..80),
        prop::collection::vec(0usize..20, 0..6),
    )
        .prop_map(|(cells, full_rows)| {
            let mut board = Board::new();
            for (x, y, kind) in cells {
                board.set(x, y, Some(kind));
            }
            for y in full_rows {
                board.fill_row(y, PieceKind::O);
            }
            board
        })
}

fn action_strategy() -> impl Strategy<Value = GameAction> {
    prop_oneof![
        4 => Just(GameAction::MoveLeft),
        4 => Just(GameAction::MoveRight),
        3 => Just(GameAction::SoftDrop),
        3 => Just(GameAction::Rotate),
        1 => Just(GameAction::HardDrop),
        1 => Just(GameAction::Pause),
    ]
}

proptest! {
    #[test]
    fn clear_lines_preserves_height_and_order(board in board_strategy()) {
        let before = board.clone();
        let clear = board.clear_lines();

        prop_assert_eq!(&board, &before);
        prop_assert_eq!(clear.board.rows().count(), BOARD_HEIGHT as usize);
        prop_assert!(clear.board.rows().all(|row| row.len() == BOARD_WIDTH as usize));

        let survivors: Vec<Vec<_>> = board
            .rows()
            .filter(|row| !row.iter().all(|c| c.is_some()))
            .map(|row| row.to_vec())
            .collect();
        let removed = BOARD_HEIGHT as usize - survivors.len();
        prop_assert_eq!(clear.count(), removed);

        let after = clear.board.to_cells();
        for row in &after[..removed] {
            prop_assert!(row.iter().all(|c| c.is_none()));
        }
        prop_assert_eq!(&after[removed..], survivors.as_slice());
        prop_assert!(clear.board.rows().all(|row| !row.iter().all(|c| c.is_some())));
    }

    #[test]
    fn collision_check_matches_free_cells(
        board in board_strategy(),
        kind in kind_strategy(),
        rotation in rotation_strategy(),
        x in -4i8..12,
        y in -4i8..22,
    ) {
        let shape = get_shape(kind, rotation);
        let all_free = shape.cells().all(|(dx, dy)| {
            let (bx, by) = (x + dx, y + dy);
            (0..BOARD_WIDTH as i8).contains(&bx)
                && by < BOARD_HEIGHT as i8
                && (by < 0 || board.is_empty_at(bx, by))
        });
        prop_assert_eq!(is_valid_position(shape, x, y, &board), all_free);
    }

    #[test]
    fn rejected_commands_do_not_change_state(
        seed in any::<u32>(),
        actions in prop::collection::vec(action_strategy(), 1..120),
    ) {
        let mut game = GameState::with_seed(seed);
        game.start_game();

        for action in actions {
            let before = game.snapshot();
            let applied = game.apply_action(action);
            if !applied {
                prop_assert_eq!(game.snapshot().board, before.board);
                prop_assert_eq!(game.snapshot().active, before.active);
                prop_assert_eq!(game.snapshot().is_paused, before.is_paused);
            }
        }
    }

    #[test]
    fn counters_stay_consistent_over_rollouts(
        seed in any::<u32>(),
        moves in prop::collection::vec((-5i8..6, 0usize..4), 1..60),
    ) {
        let mut game = GameState::with_seed(seed);
        game.start_game();
        let mut last = *game.progress();

        for (shift, turns) in moves {
            if game.is_game_over() {
                break;
            }
            for _ in 0..turns {
                game.rotate_piece();
            }
            let step = shift.signum();
            for _ in 0..shift.unsigned_abs() {
                game.move_piece(step, 0);
            }
            game.drop_piece();
            game.tick();

            let p = *game.progress();
            prop_assert!(p.score >= last.score);
            prop_assert!(p.lines >= last.lines);
            prop_assert!(p.tetris_count >= last.tetris_count);
            prop_assert_eq!(p.level, calculate_level(p.lines, 10));
            prop_assert!(p.lines - last.lines <= 4);
            last = p;
        }
    }
}
