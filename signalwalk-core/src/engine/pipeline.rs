//! Indicator pipeline: assemble, precompute, and expose per-bar frames.
//!
//! All indicators are computed once before the bar walk. Each is a pure
//! function of the bars, so they run in parallel; the walk starts only after
//! every series is in place.

use rayon::prelude::*;
use std::collections::HashSet;

use crate::components::filter::BarFilter;
use crate::components::indicator::{FrameView, Indicator, IndicatorValues};
use crate::config::StrategyConfig;
use crate::domain::Bar;
use crate::error::EngineError;
use crate::indicators::Atr;

/// The set of indicators a strategy reads, deduplicated by series name.
pub struct IndicatorPipeline {
    indicators: Vec<Box<dyn Indicator>>,
    atr_key: String,
    warm_up: usize,
}

impl IndicatorPipeline {
    /// ATR for the trailing stop, plus whatever the active filters request.
    pub fn new(atr_period: usize, filters: &[Box<dyn BarFilter>]) -> Self {
        let atr = Atr::new(atr_period);
        let atr_key = atr.name().to_string();

        let mut seen = HashSet::new();
        let mut indicators: Vec<Box<dyn Indicator>> = Vec::new();
        let requested = std::iter::once(Box::new(atr) as Box<dyn Indicator>)
            .chain(filters.iter().flat_map(|f| f.indicators()));
        for indicator in requested {
            if seen.insert(indicator.name().to_string()) {
                indicators.push(indicator);
            }
        }

        let warm_up = indicators.iter().map(|i| i.lookback()).max().unwrap_or(0);
        Self {
            indicators,
            atr_key,
            warm_up,
        }
    }

    /// Validate `config`, then assemble its indicators. Warm-up is the
    /// longest configured lookback length (see [`StrategyConfig::warm_up`]).
    pub fn from_config(config: &StrategyConfig) -> Result<Self, EngineError> {
        let filters = crate::components::filter::build_filters(config)?;
        Ok(Self::new(config.atr_period, &filters).with_min_warm_up(config.warm_up()))
    }

    /// Hold off decisions until at least `bars` bars have been seen.
    pub fn with_min_warm_up(mut self, bars: usize) -> Self {
        self.warm_up = self.warm_up.max(bars);
        self
    }

    /// Minimum series length, and the first index a decision may be taken.
    /// Never less than any indicator's count of leading NaNs.
    pub fn warm_up(&self) -> usize {
        self.warm_up
    }

    /// Series key of the trailing-stop ATR.
    pub fn atr_key(&self) -> &str {
        &self.atr_key
    }

    pub fn names(&self) -> Vec<&str> {
        self.indicators.iter().map(|i| i.name()).collect()
    }

    /// Compute every series for `bars`.
    pub fn compute<'a>(&self, bars: &'a [Bar]) -> Result<IndicatorFrames<'a>, EngineError> {
        let warm_up = self.warm_up();
        if bars.len() < warm_up {
            return Err(EngineError::InsufficientData {
                required: warm_up,
                available: bars.len(),
            });
        }

        let computed: Vec<(String, Vec<f64>)> = self
            .indicators
            .par_iter()
            .map(|indicator| {
                let series = indicator.compute(bars);
                debug_assert_eq!(
                    series.len(),
                    bars.len(),
                    "indicator '{}' produced {} values for {} bars",
                    indicator.name(),
                    series.len(),
                    bars.len()
                );
                (indicator.name().to_string(), series)
            })
            .collect();

        let mut values = IndicatorValues::new();
        for (name, series) in computed {
            values.insert(name, series);
        }

        Ok(IndicatorFrames {
            bars,
            values,
            warm_up,
        })
    }
}

/// Bars plus their precomputed indicator series.
#[derive(Debug, Clone)]
pub struct IndicatorFrames<'a> {
    bars: &'a [Bar],
    values: IndicatorValues,
    warm_up: usize,
}

impl<'a> IndicatorFrames<'a> {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn warm_up(&self) -> usize {
        self.warm_up
    }

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    pub fn values(&self) -> &IndicatorValues {
        &self.values
    }

    /// The frame at `index`, seeing bars `0..=index` only.
    pub fn view(&self, index: usize) -> FrameView<'_> {
        FrameView::new(self.bars, &self.values, index)
    }
}
