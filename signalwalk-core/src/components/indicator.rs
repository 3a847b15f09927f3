//! Indicator trait, precomputed indicator values, and the per-bar frame view.
//!
//! Indicators are pure functions: bar history in, numeric series out.
//! They are precomputed once before the bar walk and read per bar through
//! [`FrameView`]. No recomputation on each bar.

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warm-up).
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Series key (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars with undefined output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Container for precomputed indicator values.
///
/// Built once before the bar walk, then queried by bar index.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Raw value at a bar index (may be NaN during warm-up).
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Defined value at a bar index. Missing series, out-of-range index and
    /// NaN all map to `None`; undefined never becomes zero.
    pub fn defined(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.get(name, bar_index).filter(|v| !v.is_nan())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One bar plus its indicator values, with access to earlier bars only.
///
/// The view is what filters see. It cannot reach past `index`: the bar
/// slice it holds is truncated at construction.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    history: &'a [Bar],
    values: &'a IndicatorValues,
    index: usize,
}

impl<'a> FrameView<'a> {
    /// Panics if `index` is out of range for `bars`.
    pub fn new(bars: &'a [Bar], values: &'a IndicatorValues, index: usize) -> Self {
        Self {
            history: &bars[..=index],
            values,
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bar(&self) -> &'a Bar {
        &self.history[self.index]
    }

    /// The bar before this one, if any.
    pub fn prev_bar(&self) -> Option<&'a Bar> {
        self.index.checked_sub(1).map(|i| &self.history[i])
    }

    /// Defined indicator value at this bar.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.defined(name, self.index)
    }

    /// Defined indicator value at the previous bar.
    pub fn prev_value(&self, name: &str) -> Option<f64> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.values.defined(name, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn indicator_values_insert_and_get() {
        let mut iv = IndicatorValues::new();
        iv.insert(
            "sma_20",
            vec![f64::NAN; 19]
                .into_iter()
                .chain(vec![100.0, 101.0])
                .collect(),
        );
        assert!(iv.get("sma_20", 0).unwrap().is_nan());
        assert_eq!(iv.get("sma_20", 19), Some(100.0));
        assert_eq!(iv.get("sma_20", 20), Some(101.0));
        assert_eq!(iv.get("sma_20", 21), None); // out of bounds
    }

    #[test]
    fn defined_filters_nan() {
        let mut iv = IndicatorValues::new();
        iv.insert("atr_14", vec![f64::NAN, 2.0]);
        assert_eq!(iv.defined("atr_14", 0), None);
        assert_eq!(iv.defined("atr_14", 1), Some(2.0));
        assert_eq!(iv.defined("missing", 1), None);
    }

    #[test]
    fn indicator_values_len() {
        let mut iv = IndicatorValues::new();
        assert!(iv.is_empty());
        iv.insert("sma", vec![1.0, 2.0]);
        iv.insert("ema", vec![1.0, 2.0]);
        assert_eq!(iv.len(), 2);
    }

    #[test]
    fn frame_view_reads_current_and_previous() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let mut iv = IndicatorValues::new();
        iv.insert("x", vec![f64::NAN, 1.0, 2.0]);

        let first = FrameView::new(&bars, &iv, 0);
        assert!(first.prev_bar().is_none());
        assert_eq!(first.value("x"), None);

        let view = FrameView::new(&bars, &iv, 2);
        assert_eq!(view.bar().close, 12.0);
        assert_eq!(view.prev_bar().map(|b| b.close), Some(11.0));
        assert_eq!(view.value("x"), Some(2.0));
        assert_eq!(view.prev_value("x"), Some(1.0));
    }
}
