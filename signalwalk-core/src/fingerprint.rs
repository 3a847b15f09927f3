//! Run fingerprinting: deterministic identification of configs and datasets.
//!
//! - `ConfigHash`: BLAKE3 of the canonical JSON of a `StrategyConfig`.
//! - `DatasetHash`: BLAKE3 over the raw bar values.
//!
//! Two runs with equal hashes produce identical signal streams.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::StrategyConfig;
use crate::domain::Bar;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl ConfigHash {
    /// Hash of the config's canonical JSON. Field order is fixed by the
    /// struct definition, so the serialization is deterministic.
    pub fn of(config: &StrategyConfig) -> Self {
        let json = serde_json::to_string(config).unwrap_or_default();
        Self(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl DatasetHash {
    pub fn of(bars: &[Bar]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                hasher.update(&v.to_le_bytes());
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StrategyConfig {
    pub fn full_hash(&self) -> ConfigHash {
        ConfigHash::of(self)
    }
}
