//! Integration tests - full game scenarios through the public API

use std::sync::Arc;
use std::time::Duration;

use blockfall::core::{
    calculate_level, line_clear_score, DifficultyConfig, FixedSequence, GameEvent, GameState,
    ManualClock, Phase, TickOutcome,
};
use blockfall::types::{GameAction, PieceKind};

fn new_game(kinds: &[PieceKind]) -> (GameState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::with_unix_origin(1_700_000_000_000));
    let mut game = GameState::new(
        DifficultyConfig::default(),
        Box::new(FixedSequence::new(kinds.to_vec())),
        clock.clone(),
    );
    game.start_game();
    game.drain_events();
    (game, clock)
}

fn fill_row_except(game: &mut GameState, y: i8, gaps: &[i8]) {
    for x in 0..10 {
        if !gaps.contains(&x) {
            game.board_mut().set(x, y, Some(PieceKind::J));
        }
    }
}

#[test]
fn test_full_game_lifecycle() {
    let (mut game, _) = new_game(&[PieceKind::T]);
    assert_eq!(game.phase(), Phase::Playing);

    game.apply_action(GameAction::Pause);
    assert_eq!(game.phase(), Phase::Paused);
    game.apply_action(GameAction::Pause);
    assert_eq!(game.phase(), Phase::Playing);

    game.apply_action(GameAction::Reset);
    assert_eq!(game.phase(), Phase::Idle);

    game.apply_action(GameAction::Start);
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn test_single_row_clear_scenario() {
    let (mut game, _) = new_game(&[PieceKind::I]);
    // Row 19 full except where the horizontal I lands (columns 3..=6).
    fill_row_except(&mut game, 19, &[3, 4, 5, 6]);
    game.board_mut().set(9, 18, Some(PieceKind::Z));
    let untouched = game.board().row(5).to_vec();

    game.drop_piece();
    assert_eq!(game.tick(), TickOutcome::Locked { lines_cleared: 1 });

    assert_eq!(game.lines(), 1);
    assert_eq!(game.score(), line_clear_score(1, 1));
    assert_eq!(game.board().get(9, 19), Some(Some(PieceKind::Z)));
    assert_eq!(game.board().row(6), untouched.as_slice());
}

#[test]
fn test_tetris_scenario() {
    let (mut game, _) = new_game(&[PieceKind::I]);
    for y in 16..20 {
        fill_row_except(&mut game, y, &[0]);
    }

    // Vertical I against the left wall.
    assert!(game.rotate_piece());
    while game.move_piece(-1, 0) {}
    game.drop_piece();
    assert_eq!(game.tick(), TickOutcome::Locked { lines_cleared: 4 });

    assert!(game.board().is_empty());
    assert_eq!(game.tetris_count(), 1);
    assert_eq!(game.lines(), 4);
    assert_eq!(game.score(), 800);

    let events = game.drain_events();
    let names: Vec<_> = events.iter().map(GameEvent::name).collect();
    assert_eq!(names, vec!["lines:cleared", "score:updated", "combo:updated"]);
}

#[test]
fn test_tetris_at_level_two_scores_1600() {
    assert_eq!(line_clear_score(4, 2), 1600);
}

#[test]
fn test_level_formula() {
    assert_eq!(calculate_level(23, 10), 3);
}

#[test]
fn test_time_excludes_pause() {
    let (mut game, clock) = new_game(&[PieceKind::T]);

    clock.advance(Duration::from_secs(10));
    game.pause_game();
    clock.advance(Duration::from_secs(5));
    game.pause_game();
    clock.advance(Duration::from_secs(5));

    assert_eq!(game.time_played(), Duration::from_secs(15));
}

#[test]
fn test_pause_blocks_everything() {
    let (mut game, _) = new_game(&[PieceKind::T]);
    game.pause_game();
    let before = game.snapshot();

    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::Rotate,
    ] {
        assert!(!game.apply_action(action));
    }
    for _ in 0..10 {
        assert_eq!(game.tick(), TickOutcome::Skipped);
    }

    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_blocked_spawn_ends_game() {
    let (mut game, clock) = new_game(&[PieceKind::O]);
    // Obstruct the spawn box without completing a row.
    game.drop_piece();
    game.board_mut().set(4, 1, Some(PieceKind::S));
    clock.advance_ms(1234);

    assert_eq!(game.tick(), TickOutcome::GameOver { lines_cleared: 0 });
    assert!(game.is_game_over());
    assert!(!game.is_playing());
    assert!(game.active().is_none());
    // The blocked piece left nothing behind.
    assert_eq!(game.board().get(5, 0), Some(None));
    assert_eq!(game.board().get(4, 0), Some(None));

    let events = game.drain_events();
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            score: 0,
            level: 1,
            lines: 0,
            tetris_count: 0,
            time_played: 1234,
        })
    );
}

#[test]
fn test_seeded_games_are_identical() {
    let mut a = GameState::with_seed(2024);
    let mut b = GameState::with_seed(2024);
    a.start_game();
    b.start_game();

    for _ in 0..30 {
        a.drop_piece();
        b.drop_piece();
        a.tick();
        b.tick();
        assert_eq!(a.active(), b.active());
        assert_eq!(a.next_piece(), b.next_piece());
        assert_eq!(a.board(), b.board());
    }
}

#[test]
fn test_lock_event_order_with_level_up() {
    let clock = Arc::new(ManualClock::new());
    let mut game = GameState::new(
        DifficultyConfig {
            lines_per_level: 1,
            ..Default::default()
        },
        Box::new(FixedSequence::new(vec![PieceKind::I])),
        clock,
    );
    game.start_game();
    fill_row_except(&mut game, 19, &[3, 4, 5, 6]);
    game.drain_events();

    game.drop_piece();
    game.tick();

    let names: Vec<_> = game.drain_events().iter().map(GameEvent::name).collect();
    assert_eq!(
        names,
        vec!["lines:cleared", "level:up", "score:updated", "combo:updated"]
    );
}
