use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const USAGE: &str =
    "usage: blockfall [--config PATH] [--seed N] [--speed X] [--max-pieces N]";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub seed: Option<u32>,
    pub speed: Option<f64>,
    /// Stop after this many pieces have locked
    pub max_pieces: Option<u32>,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

/// Returns `None` when help was requested.
pub fn parse_args(args: &[String]) -> Result<Option<RunOptions>> {
    let mut opts = RunOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                i += 1;
                opts.config = Some(PathBuf::from(value(args, i, "--config")?));
            }
            "--seed" => {
                i += 1;
                let v = value(args, i, "--seed")?;
                opts.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--speed" => {
                i += 1;
                let v = value(args, i, "--speed")?;
                opts.speed = Some(
                    v.parse::<f64>()
                        .map_err(|_| anyhow!("invalid --speed value: {}", v))?,
                );
            }
            "--max-pieces" => {
                i += 1;
                let v = value(args, i, "--max-pieces")?;
                opts.max_pieces = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --max-pieces value: {}", v))?,
                );
            }
            other => {
                return Err(anyhow!("unknown argument: {}\n{}", other, USAGE));
            }
        }
        i += 1;
    }

    Ok(Some(opts))
}
