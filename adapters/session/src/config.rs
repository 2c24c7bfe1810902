use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use spacecells_core::Dimensions;
use spacecells_system_history::DEFAULT_DEPTH;
use spacecells_system_stepping::Delays;

/// Errors raised while loading an editor configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration at {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse configuration toml")]
    Parse(#[from] toml::de::Error),
}

/// Editor settings. Every field falls back to its default when omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo entries kept per level, including the current one.
    pub history_depth: usize,
    /// Board rows shown before a level loads.
    pub default_rows: u32,
    /// Board columns shown before a level loads.
    pub default_columns: u32,
    /// Stepping intervals.
    pub delays: DelayConfig,
    /// JSON file holding saved submissions; in-memory when absent.
    pub store_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_DEPTH,
            default_rows: 10,
            default_columns: 12,
            delays: DelayConfig::default(),
            store_path: None,
        }
    }
}

impl EditorConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Board size shown before a level loads.
    #[must_use]
    pub const fn default_dimensions(&self) -> Dimensions {
        Dimensions::new(self.default_rows, self.default_columns)
    }
}

/// Stepping intervals in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Wait before the first tick after leaving Stopped.
    pub initial_ms: u64,
    /// Wait before the move of a single step.
    pub single_step_ms: u64,
    /// Interval of the slow cadence.
    pub slow_ms: u64,
    /// Interval of the fast cadence.
    pub fast_ms: u64,
    /// Interval of the fastest cadence.
    pub fastest_ms: u64,
    /// Interval of the batch cadence.
    pub batch_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            initial_ms: 200,
            single_step_ms: 200,
            slow_ms: 1000,
            fast_ms: 100,
            fastest_ms: 0,
            batch_ms: 0,
        }
    }
}

impl From<DelayConfig> for Delays {
    fn from(config: DelayConfig) -> Self {
        Self {
            initial: Duration::from_millis(config.initial_ms),
            single_step: Duration::from_millis(config.single_step_ms),
            slow: Duration::from_millis(config.slow_ms),
            fast: Duration::from_millis(config.fast_ms),
            fastest: Duration::from_millis(config.fastest_ms),
            batch: Duration::from_millis(config.batch_ms),
        }
    }
}
