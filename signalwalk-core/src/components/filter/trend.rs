//! Trend filter: close vs. a moving average.
//!
//! Longs need close above the line, shorts need close below it. A held
//! position exits once close crosses to the wrong side.

use crate::components::filter::{BarFilter, FilterReading};
use crate::components::indicator::{FrameView, Indicator};
use crate::config::MaKind;
use crate::indicators::{Ema, Sma};

#[derive(Debug, Clone)]
pub struct TrendFilter {
    pub kind: MaKind,
    pub period: usize,
    indicator_key: String,
}

impl TrendFilter {
    pub fn new(kind: MaKind, period: usize) -> Self {
        assert!(period >= 1, "period must be >= 1");
        let prefix = match kind {
            MaKind::Ema => "ema",
            MaKind::Sma => "sma",
        };
        Self {
            kind,
            period,
            indicator_key: format!("{prefix}_{period}"),
        }
    }
}

impl BarFilter for TrendFilter {
    fn name(&self) -> &str {
        "trend"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        match self.kind {
            MaKind::Ema => vec![Box::new(Ema::new(self.period))],
            MaKind::Sma => vec![Box::new(Sma::new(self.period))],
        }
    }

    fn evaluate(&self, view: &FrameView<'_>) -> Option<FilterReading> {
        let line = view.value(&self.indicator_key)?;
        let close = view.bar().close;
        if close.is_nan() {
            return None;
        }
        Some(FilterReading {
            long_entry: close > line,
            short_entry: close < line,
            long_exit: close < line,
            short_exit: close > line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::indicators::make_bars;

    fn read(kind: MaKind, close: f64, line: f64) -> Option<FilterReading> {
        let filter = TrendFilter::new(kind, 20);
        let bars = make_bars(&[close; 6]);
        let mut line_vals = vec![f64::NAN; 6];
        line_vals[5] = line;
        let mut iv = IndicatorValues::new();
        let key = match kind {
            MaKind::Ema => "ema_20",
            MaKind::Sma => "sma_20",
        };
        iv.insert(key, line_vals);
        filter.evaluate(&FrameView::new(&bars, &iv, 5))
    }

    #[test]
    fn close_above_line_is_bullish() {
        let r = read(MaKind::Ema, 100.0, 95.0).unwrap();
        assert!(r.long_entry);
        assert!(!r.short_entry);
        assert!(!r.long_exit);
        assert!(r.short_exit);
    }

    #[test]
    fn close_below_line_is_bearish() {
        let r = read(MaKind::Sma, 100.0, 105.0).unwrap();
        assert!(!r.long_entry);
        assert!(r.short_entry);
        assert!(r.long_exit);
        assert!(!r.short_exit);
    }

    #[test]
    fn close_on_line_is_neutral() {
        let r = read(MaKind::Ema, 100.0, 100.0).unwrap();
        assert_eq!(r, FilterReading::entries(false, false));
    }

    #[test]
    fn warm_up_is_undefined() {
        let filter = TrendFilter::new(MaKind::Sma, 20);
        let bars = make_bars(&[100.0; 6]);
        let mut iv = IndicatorValues::new();
        iv.insert("sma_20", vec![f64::NAN; 6]);
        assert!(filter.evaluate(&FrameView::new(&bars, &iv, 3)).is_none());
    }

    #[test]
    fn requests_matching_indicator() {
        let ema = TrendFilter::new(MaKind::Ema, 100).indicators();
        assert_eq!(ema[0].name(), "ema_100");
        let sma = TrendFilter::new(MaKind::Sma, 150).indicators();
        assert_eq!(sma[0].name(), "sma_150");
    }
}
