//! Headless blockfall runner (default binary).
//!
//! Plays the greedy autoplay policy on the real-time loop and prints every game
//! event as a JSON line on stdout. Logs go to stderr (`RUST_LOG`, default `info`).

mod cli;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blockfall::core::SystemClock;
use blockfall::engine::{best_placement, EngineConfig, GameLoop, JsonLinesSink, Weights};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(opts) = cli::parse_args(&args)? else {
        println!("{}", cli::USAGE);
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(opts))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(opts: cli::RunOptions) -> Result<()> {
    let mut config = EngineConfig::load(opts.config.as_deref()).context("failed to load config")?;
    if let Some(seed) = opts.seed {
        config.seed = Some(seed);
    }

    let mut game = GameLoop::from_config(&config, Arc::new(SystemClock));
    game.subscribe(JsonLinesSink::new(io::stdout()));
    if let Some(speed) = opts.speed {
        game.set_speed_multiplier(speed).context("invalid --speed")?;
    }
    game.start_game();

    let weights = Weights::default();
    let mut planned_piece = 0u32;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let state = game.state();
        if state.is_game_over() {
            break;
        }
        if opts.max_pieces.is_some_and(|max| state.piece_id() > max) {
            break;
        }

        // Plan each piece once, right after it spawns.
        if let Some(active) = state.active() {
            if state.piece_id() != planned_piece {
                planned_piece = state.piece_id();
                if let Some(p) = best_placement(state.board(), active.kind, &weights) {
                    if let Err(err) = game.place(p.x, p.rotation) {
                        warn!(kind = active.kind.as_str(), error = %err, "placement rejected");
                    }
                }
            }
        }

        let Some(deadline) = game.next_deadline() else {
            break;
        };
        tokio::select! {
            _ = sleep_until(Instant::from_std(deadline)) => {
                game.pump();
            }
            res = &mut ctrl_c => {
                res.context("failed to listen for ctrl-c")?;
                info!("interrupted");
                break;
            }
        }
    }

    game.stop();
    let state = game.state();
    info!(
        score = state.score(),
        lines = state.lines(),
        level = state.level(),
        tetrises = state.tetris_count(),
        pieces = state.piece_id(),
        "run finished"
    );
    Ok(())
}
