//! Causality validator: replays every non-zero signal on a truncated prefix.
//!
//! For each bar i carrying a non-zero signal, the engine runs again on
//! `bars[..=i]` with a fresh state. If the replayed signal at i differs from
//! the production signal, the decision at i must have looked at data after i.
//! Replays share nothing and run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::StrategyConfig;
use crate::domain::{Bar, SignalRecord};
use crate::engine::SignalEngine;
use crate::error::EngineError;

/// Production and replayed signals disagree at `index`.
///
/// `replayed` is `None` when the prefix could not be evaluated at all
/// (e.g. it was shorter than the warm-up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadBiasDetected {
    pub index: usize,
    pub production: i8,
    pub replayed: Option<i8>,
}

impl std::fmt::Display for LookaheadBiasDetected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.replayed {
            Some(r) => write!(
                f,
                "lookahead bias at bar {}: production signal {} but prefix replay gives {}",
                self.index, self.production, r
            ),
            None => write!(
                f,
                "lookahead bias at bar {}: production signal {} but prefix could not be replayed",
                self.index, self.production
            ),
        }
    }
}

/// Result of a validation pass. Empty `findings` means clean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CausalityReport {
    /// Non-zero signals that were replayed.
    pub checked: usize,
    /// Mismatches, sorted by index.
    pub findings: Vec<LookaheadBiasDetected>,
}

impl CausalityReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub struct CausalityValidator {
    engine: SignalEngine,
}

impl CausalityValidator {
    pub fn new(config: StrategyConfig) -> Result<Self, EngineError> {
        Ok(Self {
            engine: SignalEngine::new(config)?,
        })
    }

    pub fn from_engine(engine: SignalEngine) -> Self {
        Self { engine }
    }

    /// Replay every non-zero signal in parallel.
    pub fn validate(&self, bars: &[Bar], records: &[SignalRecord]) -> Result<CausalityReport, EngineError> {
        let targets = Self::targets(bars, records)?;
        let mut findings: Vec<LookaheadBiasDetected> = targets
            .par_iter()
            .filter_map(|&(i, production)| self.replay(bars, i, production))
            .collect();
        findings.sort_by_key(|f| f.index);
        Ok(self.report(targets.len(), findings))
    }

    /// Single-threaded equivalent of [`CausalityValidator::validate`].
    pub fn validate_sequential(
        &self,
        bars: &[Bar],
        records: &[SignalRecord],
    ) -> Result<CausalityReport, EngineError> {
        let targets = Self::targets(bars, records)?;
        let findings: Vec<LookaheadBiasDetected> = targets
            .iter()
            .filter_map(|&(i, production)| self.replay(bars, i, production))
            .collect();
        Ok(self.report(targets.len(), findings))
    }

    fn targets(bars: &[Bar], records: &[SignalRecord]) -> Result<Vec<(usize, i8)>, EngineError> {
        if bars.len() != records.len() {
            return Err(EngineError::LengthMismatch {
                bars: bars.len(),
                signals: records.len(),
            });
        }
        Ok(records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.signal != 0)
            .map(|(i, r)| (i, r.signal))
            .collect())
    }

    fn replay(&self, bars: &[Bar], index: usize, production: i8) -> Option<LookaheadBiasDetected> {
        let replayed = self
            .engine
            .run(&bars[..=index])
            .ok()
            .and_then(|run| run.records.last().map(|r| r.signal));
        if replayed == Some(production) {
            None
        } else {
            Some(LookaheadBiasDetected {
                index,
                production,
                replayed,
            })
        }
    }

    fn report(&self, checked: usize, findings: Vec<LookaheadBiasDetected>) -> CausalityReport {
        for finding in &findings {
            warn!(%finding, "causality check failed");
        }
        info!(
            checked,
            findings = findings.len(),
            strategy = %self.engine.config().label(),
            "causality validation complete"
        );
        CausalityReport { checked, findings }
    }
}
