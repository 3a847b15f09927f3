//! Strategy configuration and named presets.
//!
//! One `StrategyConfig` describes every strategy the engine runs: the ATR
//! trailing stop and adverse-close limit are always on, and the trend,
//! momentum and volume-spike filters are optional tables. Omitted filter
//! tables are inactive.
//!
//! ```toml
//! atr_period = 14
//! trailing_stop_multiplier = 2.0
//! num_wrong_limit = 2
//!
//! [trend]
//! kind = "ema"
//! period = 100
//!
//! [momentum]
//! type = "macd"
//! fast = 6
//! slow = 19
//! signal = 4
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

fn default_atr_period() -> usize {
    14
}

fn default_trailing_stop_multiplier() -> f64 {
    2.0
}

fn default_num_wrong_limit() -> u32 {
    3
}

fn default_volume_lookback() -> usize {
    11
}

fn default_volume_std_multiplier() -> f64 {
    1.5
}

/// Moving-average flavour used by the trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaKind {
    Ema,
    Sma,
}

/// Close vs. moving average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendFilterConfig {
    pub kind: MaKind,
    pub period: usize,
}

/// Momentum oscillator gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MomentumFilterConfig {
    /// MACD line crossing its signal line.
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    /// RSI against fixed thresholds. Longs need rsi >= long_threshold,
    /// shorts need rsi <= short_threshold. With `exit_on_threshold`, a held
    /// long exits when rsi drops below short_threshold (mirror for shorts).
    Rsi {
        period: usize,
        long_threshold: f64,
        short_threshold: f64,
        #[serde(default)]
        exit_on_threshold: bool,
    },
}

/// Volume above its trailing mean by `std_multiplier` standard deviations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeFilterConfig {
    #[serde(default = "default_volume_lookback")]
    pub lookback: usize,
    #[serde(default = "default_volume_std_multiplier")]
    pub std_multiplier: f64,
}

impl Default for VolumeFilterConfig {
    fn default() -> Self {
        Self {
            lookback: default_volume_lookback(),
            std_multiplier: default_volume_std_multiplier(),
        }
    }
}

/// Immutable strategy configuration.
///
/// `Default` is the EMA trend + MACD preset. Deserialization only fills the
/// scalar knobs with defaults; filters must be listed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
    #[serde(default = "default_trailing_stop_multiplier")]
    pub trailing_stop_multiplier: f64,
    /// Consecutive adverse closes that force an exit.
    #[serde(default = "default_num_wrong_limit")]
    pub num_wrong_limit: u32,
    /// Collapse close + opposite entry into one reversal bar.
    /// Requires the volume filter.
    #[serde(default)]
    pub allow_reversal: bool,
    #[serde(default)]
    pub trend: Option<TrendFilterConfig>,
    #[serde(default)]
    pub momentum: Option<MomentumFilterConfig>,
    #[serde(default)]
    pub volume: Option<VolumeFilterConfig>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyPreset::EmaMacd.to_config()
    }
}

impl StrategyConfig {
    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.atr_period == 0 {
            return Err(EngineError::invalid("atr_period must be >= 1"));
        }
        let mult = self.trailing_stop_multiplier;
        if !mult.is_finite() || mult <= 0.0 {
            return Err(EngineError::invalid(format!(
                "trailing_stop_multiplier must be positive and finite, got {mult}"
            )));
        }
        if self.num_wrong_limit == 0 {
            return Err(EngineError::invalid("num_wrong_limit must be >= 1"));
        }
        if self.trend.is_none() && self.momentum.is_none() && self.volume.is_none() {
            return Err(EngineError::invalid(
                "at least one of trend, momentum or volume filters must be active",
            ));
        }
        if self.allow_reversal && self.volume.is_none() {
            return Err(EngineError::invalid(
                "allow_reversal requires the volume filter",
            ));
        }

        if let Some(trend) = &self.trend {
            if trend.period == 0 {
                return Err(EngineError::invalid("trend.period must be >= 1"));
            }
        }

        match &self.momentum {
            Some(MomentumFilterConfig::Macd { fast, slow, signal }) => {
                if *fast == 0 || *slow == 0 || *signal == 0 {
                    return Err(EngineError::invalid("MACD periods must be >= 1"));
                }
                if fast >= slow {
                    return Err(EngineError::invalid(format!(
                        "MACD fast ({fast}) must be less than slow ({slow})"
                    )));
                }
            }
            Some(MomentumFilterConfig::Rsi {
                period,
                long_threshold,
                short_threshold,
                ..
            }) => {
                if *period == 0 {
                    return Err(EngineError::invalid("RSI period must be >= 1"));
                }
                for (label, t) in [("long_threshold", long_threshold), ("short_threshold", short_threshold)] {
                    if !(0.0..=100.0).contains(t) {
                        return Err(EngineError::invalid(format!(
                            "RSI {label} must be within [0, 100], got {t}"
                        )));
                    }
                }
                if short_threshold > long_threshold {
                    return Err(EngineError::invalid(format!(
                        "RSI short_threshold ({short_threshold}) exceeds long_threshold ({long_threshold})"
                    )));
                }
            }
            None => {}
        }

        if let Some(volume) = &self.volume {
            if volume.lookback < 2 {
                return Err(EngineError::invalid(
                    "volume.lookback must be >= 2 (sample std needs two bars)",
                ));
            }
            let k = volume.std_multiplier;
            if !k.is_finite() || k < 0.0 {
                return Err(EngineError::invalid(format!(
                    "volume.std_multiplier must be non-negative and finite, got {k}"
                )));
            }
        }

        Ok(())
    }

    /// Bars before the first decision: the longest configured lookback.
    ///
    /// Counts lengths, not leading NaNs, so an EMA 100 trend waits for 100
    /// bars even though its first value lands at index 99. MACD counts
    /// slow + signal.
    pub fn warm_up(&self) -> usize {
        let trend = self.trend.as_ref().map_or(0, |t| t.period);
        let momentum = match &self.momentum {
            Some(MomentumFilterConfig::Macd { slow, signal, .. }) => slow + signal,
            Some(MomentumFilterConfig::Rsi { period, .. }) => *period,
            None => 0,
        };
        let volume = self.volume.as_ref().map_or(0, |v| v.lookback);
        self.atr_period.max(trend).max(momentum).max(volume)
    }

    /// Short human label, e.g. `ema100+macd6/19/4+atr14x2`.
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(t) = &self.trend {
            let kind = match t.kind {
                MaKind::Ema => "ema",
                MaKind::Sma => "sma",
            };
            parts.push(format!("{kind}{}", t.period));
        }
        match &self.momentum {
            Some(MomentumFilterConfig::Macd { fast, slow, signal }) => {
                parts.push(format!("macd{fast}/{slow}/{signal}"))
            }
            Some(MomentumFilterConfig::Rsi {
                period,
                long_threshold,
                short_threshold,
                ..
            }) => parts.push(format!("rsi{period}@{long_threshold}/{short_threshold}")),
            None => {}
        }
        if let Some(v) = &self.volume {
            parts.push(format!("vol{}", v.lookback));
        }
        parts.push(format!(
            "atr{}x{}",
            self.atr_period, self.trailing_stop_multiplier
        ));
        parts.join("+")
    }
}

// ─── StrategyPreset ─────────────────────────────────────────────────

/// The four strategy archetypes the engine generalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPreset {
    /// EMA(100) trend, MACD(6,19,4) crossover, 2 adverse closes.
    EmaMacd,
    /// Volume spike entries with same-bar reversals.
    VolumeSpike,
    /// Volume spike gated by RSI(14) at 50/50, with reversals.
    VolumeRsi,
    /// SMA(150) trend, RSI(14) at 60/40 with threshold exits.
    SmaRsi,
}

impl StrategyPreset {
    pub const ALL: [StrategyPreset; 4] = [
        Self::EmaMacd,
        Self::VolumeSpike,
        Self::VolumeRsi,
        Self::SmaRsi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::EmaMacd => "ema_macd",
            Self::VolumeSpike => "volume_spike",
            Self::VolumeRsi => "volume_rsi",
            Self::SmaRsi => "sma_rsi",
        }
    }

    /// Convert to a `StrategyConfig` with the preset's parameters.
    pub fn to_config(self) -> StrategyConfig {
        let base = StrategyConfig {
            atr_period: default_atr_period(),
            trailing_stop_multiplier: default_trailing_stop_multiplier(),
            num_wrong_limit: default_num_wrong_limit(),
            allow_reversal: false,
            trend: None,
            momentum: None,
            volume: None,
        };
        match self {
            Self::EmaMacd => StrategyConfig {
                num_wrong_limit: 2,
                trend: Some(TrendFilterConfig {
                    kind: MaKind::Ema,
                    period: 100,
                }),
                momentum: Some(MomentumFilterConfig::Macd {
                    fast: 6,
                    slow: 19,
                    signal: 4,
                }),
                ..base
            },
            Self::VolumeSpike => StrategyConfig {
                allow_reversal: true,
                volume: Some(VolumeFilterConfig::default()),
                ..base
            },
            Self::VolumeRsi => StrategyConfig {
                allow_reversal: true,
                momentum: Some(MomentumFilterConfig::Rsi {
                    period: 14,
                    long_threshold: 50.0,
                    short_threshold: 50.0,
                    exit_on_threshold: false,
                }),
                volume: Some(VolumeFilterConfig::default()),
                ..base
            },
            Self::SmaRsi => StrategyConfig {
                trend: Some(TrendFilterConfig {
                    kind: MaKind::Sma,
                    period: 150,
                }),
                momentum: Some(MomentumFilterConfig::Rsi {
                    period: 14,
                    long_threshold: 60.0,
                    short_threshold: 40.0,
                    exit_on_threshold: true,
                }),
                ..base
            },
        }
    }
}

impl fmt::Display for StrategyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyPreset {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                EngineError::invalid(format!(
                    "unknown preset '{s}'. Valid: {}",
                    valid.join(", ")
                ))
            })
    }
}
