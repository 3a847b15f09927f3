//! Signal runner: wires together data loading, the engine, and validation.
//!
//! Two entry points:
//! - `run_from_config()`: loads data per a `RunConfig`, then runs. Used by the CLI.
//! - `run_signals()`: takes pre-loaded bars and a strategy. No I/O.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use signalwalk_core::domain::{Bar, Side, SignalRecord, TradeType};
use signalwalk_core::fingerprint::{ConfigHash, DatasetHash};
use signalwalk_core::{CausalityReport, CausalityValidator, EngineError, SignalEngine, StrategyConfig};

use crate::config::{ConfigError, RunConfig};
use crate::data_loader::{load_csv, synthetic, LoadError, LoadedBars};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single signal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub config: StrategyConfig,
    pub label: String,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
    pub has_synthetic: bool,
    pub start_date: String,
    pub end_date: String,
    pub bar_count: usize,
    pub warm_up: usize,
    /// Record count per trade type, keyed by its wire name (`LONG`, `CLOSE`, ...).
    pub trade_type_counts: BTreeMap<String, usize>,
    /// Position still open after the last bar.
    pub final_side: Side,
    pub bars: Vec<Bar>,
    pub records: Vec<SignalRecord>,
    /// Present when the run was validated.
    pub causality: Option<CausalityReport>,
    pub data_quality_warnings: Vec<String>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SignalReport {
    /// Records that open, close, or reverse a position.
    pub fn transition_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_hold()).count()
    }

    pub fn count(&self, trade_type: TradeType) -> usize {
        self.trade_type_counts
            .get(trade_type.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// False only when validation ran and found lookahead.
    pub fn is_causal(&self) -> bool {
        self.causality.as_ref().map_or(true, |c| c.is_clean())
    }
}

/// Load bars as described by `config` and run its strategy.
pub fn run_from_config(config: &RunConfig) -> Result<SignalReport, RunError> {
    config.validate()?;
    let data = load_data(config)?;
    run_signals(&config.strategy_config(), &data, config.validate)
}

/// Resolve the data section into bars.
pub fn load_data(config: &RunConfig) -> Result<LoadedBars, RunError> {
    let data = &config.data;
    match (&data.path, data.synthetic_bars) {
        (Some(path), _) => Ok(load_csv(path, &data.symbol)?),
        (None, Some(n)) => Ok(synthetic(&data.symbol, n, data.seed)),
        (None, None) => Err(ConfigError::Invalid(
            "one of data.path or data.synthetic_bars is required".into(),
        )
        .into()),
    }
}

/// Run a strategy over pre-loaded bars. No I/O.
pub fn run_signals(
    strategy: &StrategyConfig,
    data: &LoadedBars,
    validate: bool,
) -> Result<SignalReport, RunError> {
    let engine = SignalEngine::new(strategy.clone())?;
    let run = engine.run(&data.bars)?;

    let mut trade_type_counts = BTreeMap::new();
    for tt in TradeType::ALL {
        trade_type_counts.insert(tt.as_str().to_string(), run.count(tt));
    }

    let causality = if validate {
        let validator = CausalityValidator::from_engine(engine);
        Some(validator.validate(&data.bars, &run.records)?)
    } else {
        None
    };

    let start_date = data
        .bars
        .first()
        .map(|b| b.date.to_string())
        .unwrap_or_default();
    let end_date = data
        .bars
        .last()
        .map(|b| b.date.to_string())
        .unwrap_or_default();

    let report = SignalReport {
        schema_version: SCHEMA_VERSION,
        symbol: data.symbol.clone(),
        config: strategy.clone(),
        label: strategy.label(),
        config_hash: strategy.full_hash(),
        dataset_hash: data.dataset_hash.clone(),
        has_synthetic: data.synthetic,
        start_date,
        end_date,
        bar_count: data.bars.len(),
        warm_up: run.start_idx,
        trade_type_counts,
        final_side: run.final_state().side,
        bars: data.bars.clone(),
        records: run.records,
        causality,
        data_quality_warnings: data.warnings.clone(),
    };

    info!(
        symbol = %report.symbol,
        strategy = %report.label,
        bars = report.bar_count,
        transitions = report.transition_count(),
        causal = report.is_causal(),
        "signal run complete"
    );

    Ok(report)
}
