//! Scoring module - line-clear scoring, leveling and gravity speed
//!
//! Rules:
//! - A lock clearing `n` rows scores `BASE_SCORES[n] * level`, scaled by the
//!   difficulty score multiplier. The level used is the one before the clear.
//! - `level = lines / lines_per_level + 1` (levels start at 1).
//! - A tetris (4 rows) bumps `tetris_count`.
//! - `combo` counts consecutive clearing locks and resets on a lock that clears nothing.

use serde::{Deserialize, Serialize};

use crate::config::DifficultyConfig;
use crate::types::{BASE_SCORES, TETRIS_LINES};

/// Cumulative scoring counters of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub tetris_count: u32,
    pub combo: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            tetris_count: 0,
            combo: 0,
        }
    }
}

/// Outcome of scoring one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub lines_cleared: usize,
    /// Points added by this lock
    pub delta: u32,
    pub previous_level: u32,
    pub previous_combo: u32,
    /// Counters after applying the lock
    pub progress: Progress,
}

impl ScoreResult {
    pub fn is_tetris(&self) -> bool {
        self.lines_cleared == TETRIS_LINES
    }

    pub fn leveled_up(&self) -> bool {
        self.progress.level > self.previous_level
    }
}

/// Base line-clear score at `level`
/// lines: number of lines cleared (0-4)
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    match BASE_SCORES.get(lines) {
        Some(&base) => base.saturating_mul(level),
        None => 0,
    }
}

/// Scale points by a non-negative multiplier, rounding to the nearest point
pub fn apply_score_multiplier(points: u32, multiplier: f64) -> u32 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return 0;
    }
    (points as f64 * multiplier).round().min(u32::MAX as f64) as u32
}

/// Level management
/// Level increases every `lines_per_level` lines cleared, starting at 1
pub fn calculate_level(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level.max(1) + 1
}

/// Apply one lock that cleared `lines` rows
pub fn score_lock(progress: &Progress, lines: usize, difficulty: &DifficultyConfig) -> ScoreResult {
    let mut next = *progress;

    let delta = apply_score_multiplier(
        line_clear_score(lines, progress.level),
        difficulty.score_multiplier,
    );

    if lines > 0 {
        next.score = next.score.saturating_add(delta);
        next.lines = next.lines.saturating_add(lines as u32);
        next.level = calculate_level(next.lines, difficulty.lines_per_level);
        next.combo = next.combo.saturating_add(1);
        if lines == TETRIS_LINES {
            next.tetris_count += 1;
        }
    } else {
        next.combo = 0;
    }

    ScoreResult {
        lines_cleared: lines,
        delta,
        previous_level: progress.level,
        previous_combo: progress.combo,
        progress: next,
    }
}

/// Gravity interval for a base interval and an effective speed multiplier.
/// Never below 1ms.
pub fn gravity_interval_ms(base_ms: u32, multiplier: f64) -> u32 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return base_ms.max(1);
    }
    let ms = (base_ms as f64 / multiplier).round();
    (ms.min(u32::MAX as f64) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_clear_score(0, 1), 0);
        assert_eq!(line_clear_score(1, 1), 100);
        assert_eq!(line_clear_score(2, 1), 300);
        assert_eq!(line_clear_score(3, 1), 500);
        assert_eq!(line_clear_score(4, 1), 800);

        assert_eq!(line_clear_score(4, 2), 1600);
        assert_eq!(line_clear_score(1, 5), 500);
        assert_eq!(line_clear_score(5, 1), 0);
    }

    #[test]
    fn test_tetris_is_eight_singles() {
        assert_eq!(line_clear_score(4, 1), 8 * line_clear_score(1, 1));
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0, 10), 1);
        assert_eq!(calculate_level(9, 10), 1);
        assert_eq!(calculate_level(10, 10), 2);
        assert_eq!(calculate_level(23, 10), 3);
        assert_eq!(calculate_level(23, 5), 5);
        assert_eq!(calculate_level(5, 0), 6);
    }

    #[test]
    fn test_score_lock_tetris() {
        let progress = Progress {
            level: 2,
            lines: 12,
            ..Default::default()
        };
        let result = score_lock(&progress, 4, &DifficultyConfig::default());

        assert_eq!(result.delta, 1600);
        assert!(result.is_tetris());
        assert_eq!(result.progress.score, 1600);
        assert_eq!(result.progress.lines, 16);
        assert_eq!(result.progress.level, 2);
        assert_eq!(result.progress.tetris_count, 1);
        assert_eq!(result.progress.combo, 1);
        assert!(!result.leveled_up());
    }

    #[test]
    fn test_score_lock_levels_up() {
        let progress = Progress {
            lines: 9,
            ..Default::default()
        };
        let result = score_lock(&progress, 1, &DifficultyConfig::default());

        assert_eq!(result.delta, 100);
        assert_eq!(result.progress.level, 2);
        assert!(result.leveled_up());
    }

    #[test]
    fn test_combo_counts_and_resets() {
        let cfg = DifficultyConfig::default();
        let mut p = Progress::default();

        p = score_lock(&p, 1, &cfg).progress;
        assert_eq!(p.combo, 1);
        p = score_lock(&p, 2, &cfg).progress;
        assert_eq!(p.combo, 2);

        let miss = score_lock(&p, 0, &cfg);
        assert_eq!(miss.progress.combo, 0);
        assert_eq!(miss.previous_combo, 2);
        assert_eq!(miss.delta, 0);
        assert_eq!(miss.progress.score, p.score);
    }

    #[test]
    fn test_score_multiplier() {
        let cfg = DifficultyConfig {
            score_multiplier: 1.5,
            ..Default::default()
        };
        let result = score_lock(&Progress::default(), 2, &cfg);
        assert_eq!(result.delta, 450);
        assert_eq!(apply_score_multiplier(100, 0.0), 0);
    }

    #[test]
    fn test_gravity_interval() {
        assert_eq!(gravity_interval_ms(1000, 1.0), 1000);
        assert_eq!(gravity_interval_ms(1000, 2.0), 500);
        assert_eq!(gravity_interval_ms(1000, 0.25), 4000);
        assert_eq!(gravity_interval_ms(1000, 3.5), 286);
        assert_eq!(gravity_interval_ms(1000, 1e9), 1);
        assert_eq!(gravity_interval_ms(1000, 0.0), 1000);
    }
}
