//! RSI threshold filter.

use crate::components::filter::{BarFilter, FilterReading};
use crate::components::indicator::{FrameView, Indicator};
use crate::indicators::Rsi;

/// Longs need `rsi >= long_threshold`, shorts need `rsi <= short_threshold`.
///
/// With `exit_on_threshold`, a held long exits when rsi falls below
/// `short_threshold` and a held short exits when rsi rises above
/// `long_threshold`.
#[derive(Debug, Clone)]
pub struct RsiThresholdFilter {
    pub period: usize,
    pub long_threshold: f64,
    pub short_threshold: f64,
    pub exit_on_threshold: bool,
    indicator_key: String,
}

impl RsiThresholdFilter {
    pub fn new(period: usize, long_threshold: f64, short_threshold: f64, exit_on_threshold: bool) -> Self {
        assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            long_threshold,
            short_threshold,
            exit_on_threshold,
            indicator_key: format!("rsi_{period}"),
        }
    }
}

impl BarFilter for RsiThresholdFilter {
    fn name(&self) -> &str {
        "rsi_threshold"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Rsi::new(self.period))]
    }

    fn evaluate(&self, view: &FrameView<'_>) -> Option<FilterReading> {
        let rsi = view.value(&self.indicator_key)?;
        Some(FilterReading {
            long_entry: rsi >= self.long_threshold,
            short_entry: rsi <= self.short_threshold,
            long_exit: self.exit_on_threshold && rsi < self.short_threshold,
            short_exit: self.exit_on_threshold && rsi > self.long_threshold,
        })
    }
}
