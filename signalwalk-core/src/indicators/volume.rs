//! Rolling volume statistics for spike detection.
//!
//! Value at bar i summarizes the `lookback` volumes strictly before i, so
//! the bar being judged never sits in its own baseline.
//! Std is the sample standard deviation (n - 1 denominator).
//! Lookback: lookback.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStat {
    Mean,
    Std,
}

#[derive(Debug, Clone)]
pub struct VolumeWindow {
    lookback: usize,
    stat: VolumeStat,
    name: String,
}

impl VolumeWindow {
    pub fn new(lookback: usize, stat: VolumeStat) -> Self {
        assert!(lookback >= 2, "volume lookback must be >= 2");
        let name = match stat {
            VolumeStat::Mean => Self::mean_key(lookback),
            VolumeStat::Std => Self::std_key(lookback),
        };
        Self {
            lookback,
            stat,
            name,
        }
    }

    pub fn mean(lookback: usize) -> Self {
        Self::new(lookback, VolumeStat::Mean)
    }

    pub fn std(lookback: usize) -> Self {
        Self::new(lookback, VolumeStat::Std)
    }

    pub fn mean_key(lookback: usize) -> String {
        format!("volume_mean_{lookback}")
    }

    pub fn std_key(lookback: usize) -> String {
        format!("volume_std_{lookback}")
    }
}

impl Indicator for VolumeWindow {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.lookback
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        let len = self.lookback as f64;

        for i in self.lookback..n {
            let window = &bars[i - self.lookback..i];
            if window.iter().any(|b| b.volume.is_nan()) {
                continue;
            }
            let mean = window.iter().map(|b| b.volume).sum::<f64>() / len;
            result[i] = match self.stat {
                VolumeStat::Mean => mean,
                VolumeStat::Std => {
                    let ss: f64 = window.iter().map(|b| (b.volume - mean).powi(2)).sum();
                    (ss / (len - 1.0)).sqrt()
                }
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars_with_volume, DEFAULT_EPSILON};

    #[test]
    fn mean_excludes_current_bar() {
        let bars = make_bars_with_volume(&[1.0; 5], &[10.0, 20.0, 30.0, 1_000.0, 5.0]);
        let result = VolumeWindow::mean(3).compute(&bars);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        // Bar 3 sees [10, 20, 30] only
        assert_approx(result[3], 20.0, DEFAULT_EPSILON);
        assert_approx(result[4], 350.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_is_sample_std() {
        let bars = make_bars_with_volume(&[1.0; 4], &[2.0, 4.0, 6.0, 0.0]);
        let result = VolumeWindow::std(3).compute(&bars);
        // mean 4, squared deviations 4 + 0 + 4 = 8, / (3 - 1) = 4
        assert_approx(result[3], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_volume_blanks_windows_that_contain_it() {
        let bars = make_bars_with_volume(&[1.0; 6], &[1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0]);
        let result = VolumeWindow::mean(2).compute(&bars);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert_approx(result[4], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn keys() {
        assert_eq!(VolumeWindow::mean(11).name(), "volume_mean_11");
        assert_eq!(VolumeWindow::std(11).name(), "volume_std_11");
        assert_eq!(VolumeWindow::std(11).lookback(), 11);
    }
}
