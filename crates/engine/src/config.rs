//! Engine configuration, loaded from TOML.
//!
//! Lookup order: an explicit path, then the `BLOCKFALL_CONFIG` environment
//! variable, then built-in defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{ConfigError, DifficultyConfig};
use crate::types::{BASE_DROP_MS, TIME_TICK_MS};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "BLOCKFALL_CONFIG";

/// Timer periods in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Gravity interval at speed 1.0
    pub base_drop_ms: u32,
    /// Period of `time:tick` notifications
    pub time_tick_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_drop_ms: BASE_DROP_MS,
            time_tick_ms: TIME_TICK_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Piece sampler seed; a time-derived seed is used when absent
    pub seed: Option<u32>,
    pub timing: TimingConfig,
    pub difficulty: DifficultyConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, LoadError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.timing.base_drop_ms == 0 {
            return Err(LoadError::ZeroInterval("base_drop_ms"));
        }
        if self.timing.time_tick_ms == 0 {
            return Err(LoadError::ZeroInterval("time_tick_ms"));
        }
        self.difficulty.validate()?;
        Ok(())
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "rejected config file");
        })
    }

    /// Write the config as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load from `explicit`, else `$BLOCKFALL_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, LoadError> {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match resolve_config_path(explicit, env) {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Pick the config file to read, if any
pub fn resolve_config_path(explicit: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|p| !p.as_os_str().is_empty()))
}

// Custom error type for configuration loading
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(ConfigError),
    ZeroInterval(&'static str),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "config i/o error: {}", err),
            LoadError::Parse(err) => write!(f, "config parse error: {}", err),
            LoadError::Serialize(err) => write!(f, "config serialize error: {}", err),
            LoadError::Invalid(err) => write!(f, "invalid config: {}", err),
            LoadError::ZeroInterval(field) => write!(f, "timing.{} must be at least 1", field),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Parse(err) => Some(err),
            LoadError::Serialize(err) => Some(err),
            LoadError::Invalid(err) => Some(err),
            LoadError::ZeroInterval(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(err: toml::de::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl From<toml::ser::Error> for LoadError {
    fn from(err: toml::ser::Error) -> Self {
        LoadError::Serialize(err)
    }
}

impl From<ConfigError> for LoadError {
    fn from(err: ConfigError) -> Self {
        LoadError::Invalid(err)
    }
}
