//! Run configuration loaded from TOML.
//!
//! ```toml
//! validate = true
//!
//! [data]
//! path = "data/SPY.csv"
//! symbol = "SPY"
//!
//! [strategy]
//! preset = "volume_rsi"
//!
//! [output]
//! dir = "results"
//! ```
//!
//! `[strategy]` is either `preset = "..."` or a full strategy table
//! (`atr_period`, `[strategy.trend]`, `[strategy.momentum]`, ...).
//! `[data]` takes either `path` or `synthetic_bars`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use signalwalk_core::{EngineError, StrategyConfig, StrategyPreset};

/// Errors from loading or checking a run config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid run config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Strategy(#[from] EngineError),
}

fn default_symbol() -> String {
    "UNKNOWN".into()
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    /// CSV file with `date,open,high,low,close,volume` columns.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Generate this many synthetic bars instead of reading a file.
    #[serde(default)]
    pub synthetic_bars: Option<usize>,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Named preset or an explicit strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategySection {
    Preset { preset: StrategyPreset },
    Custom(StrategyConfig),
}

impl StrategySection {
    pub fn resolve(&self) -> StrategyConfig {
        match self {
            Self::Preset { preset } => preset.to_config(),
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for StrategySection {
    fn default() -> Self {
        Self::Preset {
            preset: StrategyPreset::EmaMacd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// One signal run: data source, strategy, output location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub data: DataSection,
    #[serde(default)]
    pub strategy: StrategySection,
    #[serde(default)]
    pub output: OutputSection,
    /// Replay every non-zero signal on its prefix after the run.
    #[serde(default)]
    pub validate: bool,
}

impl RunConfig {
    /// Load from a TOML file. Relative data paths resolve against the
    /// config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(data_path), Some(base)) = (config.data.path.as_mut(), path.parent()) {
            if data_path.is_relative() {
                *data_path = base.join(&*data_path);
            }
        }
        Ok(config)
    }

    /// Parse and check a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.data.path, self.data.synthetic_bars) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "data.path and data.synthetic_bars are mutually exclusive".into(),
                ))
            }
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "one of data.path or data.synthetic_bars is required".into(),
                ))
            }
            (None, Some(0)) => {
                return Err(ConfigError::Invalid("data.synthetic_bars must be >= 1".into()))
            }
            _ => {}
        }
        self.strategy.resolve().validate()?;
        Ok(())
    }

    /// The strategy this run executes.
    pub fn strategy_config(&self) -> StrategyConfig {
        self.strategy.resolve()
    }
}
