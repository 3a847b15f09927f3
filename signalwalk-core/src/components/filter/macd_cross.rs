//! MACD crossover filter.
//!
//! A cross up happens at bar i when the MACD line was below its signal line
//! at i-1 and is above it at i. Cross down is the mirror. Bars where either
//! side of the comparison is undefined never produce a crossover.

use crate::components::filter::{BarFilter, FilterReading};
use crate::components::indicator::{FrameView, Indicator};
use crate::indicators::Macd;

#[derive(Debug, Clone)]
pub struct MacdCrossFilter {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    line_key: String,
    signal_key: String,
}

impl MacdCrossFilter {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast,
            slow,
            signal,
            line_key: Macd::line_key(fast, slow, signal),
            signal_key: Macd::signal_key(fast, slow, signal),
        }
    }
}

impl BarFilter for MacdCrossFilter {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Macd::line(self.fast, self.slow, self.signal)),
            Box::new(Macd::signal_line(self.fast, self.slow, self.signal)),
        ]
    }

    fn evaluate(&self, view: &FrameView<'_>) -> Option<FilterReading> {
        let macd = view.value(&self.line_key)?;
        let signal = view.value(&self.signal_key)?;

        let (cross_up, cross_down) = match (
            view.prev_value(&self.line_key),
            view.prev_value(&self.signal_key),
        ) {
            (Some(prev_macd), Some(prev_signal)) => (
                prev_macd < prev_signal && macd > signal,
                prev_macd > prev_signal && macd < signal,
            ),
            _ => (false, false),
        };

        Some(FilterReading {
            long_entry: cross_up,
            short_entry: cross_down,
            long_exit: cross_down,
            short_exit: cross_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::indicators::make_bars;

    fn frame(line: Vec<f64>, signal: Vec<f64>) -> (Vec<crate::domain::Bar>, IndicatorValues) {
        let bars = make_bars(&vec![100.0; line.len()]);
        let mut iv = IndicatorValues::new();
        iv.insert(Macd::line_key(6, 19, 4), line);
        iv.insert(Macd::signal_key(6, 19, 4), signal);
        (bars, iv)
    }

    #[test]
    fn detects_cross_up() {
        let (bars, iv) = frame(vec![-1.0, 1.0], vec![0.0, 0.0]);
        let r = MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .unwrap();
        assert!(r.long_entry);
        assert!(r.short_exit);
        assert!(!r.short_entry);
        assert!(!r.long_exit);
    }

    #[test]
    fn detects_cross_down() {
        let (bars, iv) = frame(vec![1.0, -1.0], vec![0.0, 0.0]);
        let r = MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .unwrap();
        assert!(r.short_entry);
        assert!(r.long_exit);
        assert!(!r.long_entry);
    }

    #[test]
    fn staying_above_is_not_a_cross() {
        let (bars, iv) = frame(vec![1.0, 2.0], vec![0.0, 0.0]);
        let r = MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .unwrap();
        assert_eq!(r, FilterReading::entries(false, false));
    }

    #[test]
    fn touching_then_crossing_needs_strict_prior_side() {
        let (bars, iv) = frame(vec![0.0, 1.0], vec![0.0, 0.0]);
        let r = MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .unwrap();
        assert!(!r.long_entry);
    }

    #[test]
    fn undefined_previous_means_no_cross() {
        let (bars, iv) = frame(vec![f64::NAN, 1.0], vec![f64::NAN, 0.0]);
        let r = MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .unwrap();
        assert_eq!(r, FilterReading::entries(false, false));
    }

    #[test]
    fn undefined_current_skips_bar() {
        let (bars, iv) = frame(vec![-1.0, 1.0], vec![0.0, f64::NAN]);
        assert!(MacdCrossFilter::new(6, 19, 4)
            .evaluate(&FrameView::new(&bars, &iv, 1))
            .is_none());
    }
}
