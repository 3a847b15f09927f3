//! Look-ahead contamination tests for every indicator and for the engine.
//!
//! No value at bar t may depend on bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs. Any
//! difference means the computation is leaking future data into past values.

use chrono::NaiveDate;
use signalwalk_core::components::indicator::Indicator;
use signalwalk_core::domain::Bar;
use signalwalk_core::indicators::*;
use signalwalk_core::{SignalEngine, StrategyPreset};

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0);

        let open = price - 0.5 * if i % 3 == 0 { -1.0 } else { 1.0 };
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;
        let volume = if i % 13 == 5 {
            9000.0
        } else {
            1000.0 + ((seed >> 7) % 400) as f64
        };

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars
}

/// Assert that the indicator produces identical values for bars 0..truncated_len
/// whether computed on a truncated or full series.
fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );
    assert_eq!(
        full_result.len(),
        full_bars.len(),
        "{}: full result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );

        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}, diff={}",
            indicator.name(),
            (t - f).abs()
        );
    }
}

/// Exactly `lookback()` leading NaNs, then defined values.
fn assert_warm_up_matches_lookback(indicator: &dyn Indicator, bars: &[Bar]) {
    let values = indicator.compute(bars);
    let lookback = indicator.lookback();
    assert!(
        values[..lookback].iter().all(|v| v.is_nan()),
        "{}: defined value inside warm-up",
        indicator.name()
    );
    assert!(
        values[lookback..].iter().all(|v| !v.is_nan()),
        "{}: undefined value after warm-up",
        indicator.name()
    );
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(10), &bars, 100);
    assert_no_lookahead(&Sma::new(50), &bars, 100);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(10), &bars, 100);
    assert_no_lookahead(&Ema::new(50), &bars, 100);
}

#[test]
fn lookahead_atr() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Atr::new(14), &bars, 100);
    assert_no_lookahead(&Atr::new(5), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(7), &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Macd::line(6, 19, 4), &bars, 100);
    assert_no_lookahead(&Macd::signal_line(6, 19, 4), &bars, 100);
    assert_no_lookahead(&Macd::line(12, 26, 9), &bars, 100);
    assert_no_lookahead(&Macd::signal_line(12, 26, 9), &bars, 100);
}

#[test]
fn lookahead_volume_window() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&VolumeWindow::mean(11), &bars, 100);
    assert_no_lookahead(&VolumeWindow::std(11), &bars, 100);
}

#[test]
fn volume_window_ignores_current_bar() {
    let mut bars = make_test_bars(40);
    let before_mean = VolumeWindow::mean(11).compute(&bars);
    let before_std = VolumeWindow::std(11).compute(&bars);
    bars[30].volume = 1_000_000.0;
    let after_mean = VolumeWindow::mean(11).compute(&bars);
    let after_std = VolumeWindow::std(11).compute(&bars);
    assert_eq!(before_mean[30], after_mean[30]);
    assert_eq!(before_std[30], after_std[30]);
    assert_ne!(before_mean[31], after_mean[31]);
}

#[test]
fn warm_up_lengths_match_lookback() {
    let bars = make_test_bars(120);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(20)),
        Box::new(Ema::new(20)),
        Box::new(Atr::new(14)),
        Box::new(Rsi::new(14)),
        Box::new(Macd::line(6, 19, 4)),
        Box::new(Macd::signal_line(6, 19, 4)),
        Box::new(VolumeWindow::mean(11)),
        Box::new(VolumeWindow::std(11)),
    ];
    for indicator in &indicators {
        assert_warm_up_matches_lookback(indicator.as_ref(), &bars);
    }
}

#[test]
fn lookahead_engine_signals_and_states() {
    let bars = make_test_bars(400);
    for preset in StrategyPreset::ALL {
        let engine = SignalEngine::new(preset.to_config()).unwrap();
        let full = engine.run(&bars).unwrap();
        for cut in [200, 250, 333] {
            let truncated = engine.run(&bars[..cut]).unwrap();
            assert_eq!(
                truncated.records[..],
                full.records[..cut],
                "{preset}: signals differ on prefix of {cut} bars"
            );
            assert_eq!(
                truncated.states[..],
                full.states[..cut],
                "{preset}: states differ on prefix of {cut} bars"
            );
        }
    }
}
