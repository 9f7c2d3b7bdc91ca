//! Difficulty configuration supplied by the host.
//!
//! The engine reads these values at spawn and scoring time, so replacing the
//! configuration mid-game takes effect on the next spawn or lock.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, DEFAULT_LINES_PER_LEVEL};

/// Which piece sampler a game is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Independent weighted draws using `piece_weights`
    #[default]
    Weighted,
    /// Classic 7-bag; weights are ignored
    Bag,
}

fn one() -> f64 {
    1.0
}

/// Relative spawn weight per piece kind. Missing entries default to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceWeights {
    #[serde(rename = "I", default = "one")]
    pub i: f64,
    #[serde(rename = "O", default = "one")]
    pub o: f64,
    #[serde(rename = "T", default = "one")]
    pub t: f64,
    #[serde(rename = "S", default = "one")]
    pub s: f64,
    #[serde(rename = "Z", default = "one")]
    pub z: f64,
    #[serde(rename = "J", default = "one")]
    pub j: f64,
    #[serde(rename = "L", default = "one")]
    pub l: f64,
}

impl PieceWeights {
    pub fn uniform() -> Self {
        Self::from_array([1.0; 7])
    }

    /// Build from weights ordered as [`PieceKind::ALL`]
    pub fn from_array(w: [f64; 7]) -> Self {
        Self {
            i: w[0],
            o: w[1],
            t: w[2],
            s: w[3],
            z: w[4],
            j: w[5],
            l: w[6],
        }
    }

    pub fn get(&self, kind: PieceKind) -> f64 {
        match kind {
            PieceKind::I => self.i,
            PieceKind::O => self.o,
            PieceKind::T => self.t,
            PieceKind::S => self.s,
            PieceKind::Z => self.z,
            PieceKind::J => self.j,
            PieceKind::L => self.l,
        }
    }

    pub fn set(&mut self, kind: PieceKind, weight: f64) {
        match kind {
            PieceKind::I => self.i = weight,
            PieceKind::O => self.o = weight,
            PieceKind::T => self.t = weight,
            PieceKind::S => self.s = weight,
            PieceKind::Z => self.z = weight,
            PieceKind::J => self.j = weight,
            PieceKind::L => self.l = weight,
        }
    }

    /// Usable weight: finite and positive, else 0
    pub fn effective(&self, kind: PieceKind) -> f64 {
        let w = self.get(kind);
        if w.is_finite() && w > 0.0 {
            w
        } else {
            0.0
        }
    }

    pub fn total(&self) -> f64 {
        PieceKind::ALL.iter().map(|&k| self.effective(k)).sum()
    }
}

impl Default for PieceWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Difficulty knobs consumed by spawning, scoring and gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Multiplies the user speed multiplier when computing the gravity interval
    pub speed_multiplier: f64,
    pub lines_per_level: u32,
    /// Multiplies every line-clear score delta
    pub score_multiplier: f64,
    pub randomizer: Randomizer,
    pub piece_weights: PieceWeights,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            lines_per_level: DEFAULT_LINES_PER_LEVEL,
            score_multiplier: 1.0,
            randomizer: Randomizer::default(),
            piece_weights: PieceWeights::default(),
        }
    }
}

impl DifficultyConfig {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed_multiplier.is_finite() || self.speed_multiplier <= 0.0 {
            return Err(ConfigError::InvalidSpeedMultiplier(self.speed_multiplier));
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if !self.score_multiplier.is_finite() || self.score_multiplier < 0.0 {
            return Err(ConfigError::InvalidScoreMultiplier(self.score_multiplier));
        }
        for kind in PieceKind::ALL {
            let w = self.piece_weights.get(kind);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidPieceWeight { kind, weight: w });
            }
        }
        Ok(())
    }
}

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidSpeedMultiplier(f64),
    InvalidScoreMultiplier(f64),
    InvalidPieceWeight { kind: PieceKind, weight: f64 },
    ZeroLinesPerLevel,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSpeedMultiplier(v) => {
                write!(f, "speed multiplier must be finite and > 0, got {}", v)
            }
            ConfigError::InvalidScoreMultiplier(v) => {
                write!(f, "score multiplier must be finite and >= 0, got {}", v)
            }
            ConfigError::InvalidPieceWeight { kind, weight } => write!(
                f,
                "piece weight for {} must be finite and >= 0, got {}",
                kind.as_str(),
                weight
            ),
            ConfigError::ZeroLinesPerLevel => write!(f, "lines_per_level must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(DifficultyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = DifficultyConfig {
            speed_multiplier: 0.0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidSpeedMultiplier(0.0)));

        cfg.speed_multiplier = 1.0;
        cfg.lines_per_level = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLinesPerLevel));

        cfg.lines_per_level = 10;
        cfg.piece_weights.set(PieceKind::S, -1.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPieceWeight {
                kind: PieceKind::S,
                ..
            })
        ));
    }

    #[test]
    fn weights_deserialize_with_defaults() {
        let w: PieceWeights = serde_json::from_str(r#"{"I": 3.0, "Z": 0.0}"#).unwrap();
        assert_eq!(w.get(PieceKind::I), 3.0);
        assert_eq!(w.get(PieceKind::Z), 0.0);
        assert_eq!(w.get(PieceKind::T), 1.0);
        assert_eq!(w.total(), 8.0);
    }

    #[test]
    fn effective_weight_drops_nan() {
        let mut w = PieceWeights::uniform();
        w.set(PieceKind::O, f64::NAN);
        assert_eq!(w.effective(PieceKind::O), 0.0);
    }
}
