//! SignalWalk Core: causal signal generation over daily OHLCV bars.
//!
//! This crate contains:
//! - Domain types (bars, position state, signal records)
//! - Indicators (EMA, SMA, ATR, RSI, MACD, rolling volume stats)
//! - Bar filters composed into one configurable strategy
//! - Indicator pipeline and the per-bar position state machine
//! - Causality validator replaying signals on truncated prefixes
//! - Strategy configuration, presets, and BLAKE3 fingerprints

pub mod components;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod validation;

pub use config::{StrategyConfig, StrategyPreset};
pub use domain::{Bar, PositionState, Side, SignalRecord, TradeType};
pub use engine::{SignalEngine, SignalRun};
pub use error::EngineError;
pub use validation::{CausalityReport, CausalityValidator, LookaheadBiasDetected};

/// Run `config` over `bars` from a flat position.
pub fn generate_signals(bars: &[Bar], config: &StrategyConfig) -> Result<SignalRun, EngineError> {
    SignalEngine::new(config.clone())?.run(bars)
}

/// Replay every non-zero signal in `records` on its prefix of `bars`.
pub fn check_causality(
    bars: &[Bar],
    records: &[SignalRecord],
    config: &StrategyConfig,
) -> Result<CausalityReport, EngineError> {
    CausalityValidator::new(config.clone())?.validate(bars, records)
}
