//! Volume-spike filter.
//!
//! Passes both entry sides when the current volume exceeds the mean of the
//! preceding `lookback` bars by `std_multiplier` sample standard deviations.
//! Direction comes from the candle, which the state machine checks.

use crate::components::filter::{BarFilter, FilterReading};
use crate::components::indicator::{FrameView, Indicator};
use crate::indicators::VolumeWindow;

#[derive(Debug, Clone)]
pub struct VolumeSpikeFilter {
    pub lookback: usize,
    pub std_multiplier: f64,
    mean_key: String,
    std_key: String,
}

impl VolumeSpikeFilter {
    pub fn new(lookback: usize, std_multiplier: f64) -> Self {
        assert!(lookback >= 2, "lookback must be >= 2");
        Self {
            lookback,
            std_multiplier,
            mean_key: VolumeWindow::mean_key(lookback),
            std_key: VolumeWindow::std_key(lookback),
        }
    }

    /// Volume level a bar must exceed to count as a spike.
    pub fn threshold(&self, mean: f64, std: f64) -> f64 {
        mean + self.std_multiplier * std
    }
}

impl BarFilter for VolumeSpikeFilter {
    fn name(&self) -> &str {
        "volume_spike"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(VolumeWindow::mean(self.lookback)),
            Box::new(VolumeWindow::std(self.lookback)),
        ]
    }

    fn evaluate(&self, view: &FrameView<'_>) -> Option<FilterReading> {
        let mean = view.value(&self.mean_key)?;
        let std = view.value(&self.std_key)?;
        let volume = view.bar().volume;
        if volume.is_nan() {
            return None;
        }
        let spike = volume > self.threshold(mean, std);
        Some(FilterReading::entries(spike, spike))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::indicators::make_bars_with_volume;

    fn read(volume: f64, mean: f64, std: f64) -> Option<FilterReading> {
        let filter = VolumeSpikeFilter::new(11, 1.5);
        let bars = make_bars_with_volume(&[100.0, 101.0], &[1000.0, volume]);
        let mut iv = IndicatorValues::new();
        iv.insert("volume_mean_11", vec![f64::NAN, mean]);
        iv.insert("volume_std_11", vec![f64::NAN, std]);
        filter.evaluate(&FrameView::new(&bars, &iv, 1))
    }

    #[test]
    fn spike_allows_both_sides() {
        // threshold = 1000 + 1.5 * 100 = 1150
        assert_eq!(read(1200.0, 1000.0, 100.0), Some(FilterReading::entries(true, true)));
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(read(1150.0, 1000.0, 100.0), Some(FilterReading::entries(false, false)));
    }

    #[test]
    fn never_requests_exit() {
        let r = read(5000.0, 1000.0, 100.0).unwrap();
        assert!(!r.long_exit && !r.short_exit);
    }

    #[test]
    fn undefined_stats_skip_bar() {
        assert!(read(1200.0, f64::NAN, 100.0).is_none());
    }
}
