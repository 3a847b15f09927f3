//! Bar filters: the composable predicates that gate entries and exits.
//!
//! Each active filter reads the current frame and votes on four questions:
//! may a long open, may a short open, should a held long exit, should a held
//! short exit. Entry votes combine with AND, exit votes with OR. The state
//! machine adds the candle-direction check and everything position related.

pub mod macd_cross;
pub mod rsi_threshold;
pub mod trend;
pub mod volume_spike;

use super::indicator::{FrameView, Indicator};
use crate::config::{MomentumFilterConfig, StrategyConfig};
use crate::error::EngineError;

pub use macd_cross::MacdCrossFilter;
pub use rsi_threshold::RsiThresholdFilter;
pub use trend::TrendFilter;
pub use volume_spike::VolumeSpikeFilter;

/// One filter's vote for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReading {
    pub long_entry: bool,
    pub short_entry: bool,
    pub long_exit: bool,
    pub short_exit: bool,
}

impl FilterReading {
    /// Identity for [`FilterReading::and`]: permits both entries, requests no exit.
    pub const PERMISSIVE: Self = Self {
        long_entry: true,
        short_entry: true,
        long_exit: false,
        short_exit: false,
    };

    /// Entry-only reading; the filter never forces an exit.
    pub fn entries(long_entry: bool, short_entry: bool) -> Self {
        Self {
            long_entry,
            short_entry,
            long_exit: false,
            short_exit: false,
        }
    }

    /// Combine two votes: entries need both, exits need either.
    pub fn and(self, other: Self) -> Self {
        Self {
            long_entry: self.long_entry && other.long_entry,
            short_entry: self.short_entry && other.short_entry,
            long_exit: self.long_exit || other.long_exit,
            short_exit: self.short_exit || other.short_exit,
        }
    }
}

/// Trait for bar filters.
///
/// # Causality
/// `evaluate` receives a [`FrameView`], which exposes bars and indicator
/// values at or before the current index only.
pub trait BarFilter: Send + Sync {
    /// Human-readable name (e.g., "trend", "volume_spike").
    fn name(&self) -> &str;

    /// Indicators this filter reads. The pipeline computes their union.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Vote on the current bar. `None` means a required indicator is
    /// undefined here and the bar must be skipped.
    fn evaluate(&self, view: &FrameView<'_>) -> Option<FilterReading>;
}

/// Build the active filters for a config, in trend → momentum → volume order.
/// The config is validated first.
pub fn build_filters(config: &StrategyConfig) -> Result<Vec<Box<dyn BarFilter>>, EngineError> {
    config.validate()?;
    let mut filters: Vec<Box<dyn BarFilter>> = Vec::new();

    if let Some(trend) = &config.trend {
        filters.push(Box::new(TrendFilter::new(trend.kind, trend.period)));
    }

    match &config.momentum {
        Some(MomentumFilterConfig::Macd { fast, slow, signal }) => {
            filters.push(Box::new(MacdCrossFilter::new(*fast, *slow, *signal)));
        }
        Some(MomentumFilterConfig::Rsi {
            period,
            long_threshold,
            short_threshold,
            exit_on_threshold,
        }) => {
            filters.push(Box::new(RsiThresholdFilter::new(
                *period,
                *long_threshold,
                *short_threshold,
                *exit_on_threshold,
            )));
        }
        None => {}
    }

    if let Some(volume) = &config.volume {
        filters.push(Box::new(VolumeSpikeFilter::new(
            volume.lookback,
            volume.std_multiplier,
        )));
    }

    Ok(filters)
}

/// Evaluate every filter and fold the votes. `None` if any filter is
/// missing data at this bar.
pub fn evaluate_all(filters: &[Box<dyn BarFilter>], view: &FrameView<'_>) -> Option<FilterReading> {
    filters
        .iter()
        .try_fold(FilterReading::PERMISSIVE, |acc, f| {
            f.evaluate(view).map(|r| acc.and(r))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::config::StrategyPreset;
    use crate::indicators::make_bars;

    struct Fixed(Option<FilterReading>);

    impl BarFilter for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn indicators(&self) -> Vec<Box<dyn Indicator>> {
            Vec::new()
        }
        fn evaluate(&self, _view: &FrameView<'_>) -> Option<FilterReading> {
            self.0
        }
    }

    #[test]
    fn entries_and_exits_combine() {
        let a = FilterReading {
            long_entry: true,
            short_entry: false,
            long_exit: false,
            short_exit: true,
        };
        let b = FilterReading {
            long_entry: true,
            short_entry: true,
            long_exit: true,
            short_exit: false,
        };
        let c = a.and(b);
        assert!(c.long_entry);
        assert!(!c.short_entry);
        assert!(c.long_exit);
        assert!(c.short_exit);
    }

    #[test]
    fn any_undefined_filter_skips_bar() {
        let bars = make_bars(&[1.0, 2.0]);
        let iv = IndicatorValues::new();
        let view = FrameView::new(&bars, &iv, 1);
        let filters: Vec<Box<dyn BarFilter>> = vec![
            Box::new(Fixed(Some(FilterReading::PERMISSIVE))),
            Box::new(Fixed(None)),
        ];
        assert_eq!(evaluate_all(&filters, &view), None);
    }

    #[test]
    fn build_filters_follows_config() {
        let names = |preset: StrategyPreset| -> Vec<String> {
            build_filters(&preset.to_config())
                .unwrap()
                .iter()
                .map(|f| f.name().to_string())
                .collect()
        };
        assert_eq!(names(StrategyPreset::EmaMacd), ["trend", "macd_cross"]);
        assert_eq!(names(StrategyPreset::VolumeSpike), ["volume_spike"]);
        assert_eq!(names(StrategyPreset::VolumeRsi), ["rsi_threshold", "volume_spike"]);
        assert_eq!(names(StrategyPreset::SmaRsi), ["trend", "rsi_threshold"]);
    }

    #[test]
    fn build_filters_rejects_invalid_config() {
        let mut config = StrategyPreset::EmaMacd.to_config();
        config.momentum = Some(MomentumFilterConfig::Macd {
            fast: 19,
            slow: 6,
            signal: 4,
        });
        assert!(matches!(
            build_filters(&config),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
