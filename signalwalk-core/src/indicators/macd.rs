//! Moving Average Convergence/Divergence (MACD).
//!
//! Line: EMA(fast) - EMA(slow) of close.
//! Signal: EMA(line, signal_period), seeded at the line's first defined value.
//! Lookback: slow - 1 for the line, slow + signal - 2 for the signal.

use super::ema::ema_of_series;
use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Which MACD series an instance produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    fn new(fast: usize, slow: usize, signal: usize, output: MacdOutput) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be less than slow period");
        let name = match output {
            MacdOutput::Line => Self::line_key(fast, slow, signal),
            MacdOutput::Signal => Self::signal_key(fast, slow, signal),
        };
        Self {
            fast,
            slow,
            signal,
            output,
            name,
        }
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdOutput::Line)
    }

    pub fn signal_line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdOutput::Signal)
    }

    pub fn line_key(fast: usize, slow: usize, signal: usize) -> String {
        format!("macd_{fast}_{slow}_{signal}")
    }

    pub fn signal_key(fast: usize, slow: usize, signal: usize) -> String {
        format!("macd_signal_{fast}_{slow}_{signal}")
    }

    fn macd_line(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.output {
            MacdOutput::Line => self.slow - 1,
            MacdOutput::Signal => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let line = self.macd_line(bars);
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal => ema_of_series(&line, self.signal),
        }
    }
}
