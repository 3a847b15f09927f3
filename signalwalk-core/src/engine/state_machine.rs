//! Position state machine: the per-bar walk that turns frames into signals.
//!
//! One decision per bar, strictly in order. Bar i reads the state left by
//! bar i-1 and the frame at i, and yields the next state plus one record.
//! Bars before the warm-up index, and bars where any needed indicator is
//! undefined, emit HOLD and leave the state untouched.
//!
//! In-position priority: reversal, then close (exit signal, adverse-close
//! limit, stop breach), then ratchet the stop.

use tracing::debug;

use crate::components::filter::{build_filters, evaluate_all, BarFilter};
use crate::components::indicator::FrameView;
use crate::config::StrategyConfig;
use crate::domain::{Bar, PositionState, Side, SignalRecord, TradeType};
use crate::error::EngineError;

use super::pipeline::{IndicatorFrames, IndicatorPipeline};

/// Output of one pass over a bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRun {
    /// One record per input bar, same order.
    pub records: Vec<SignalRecord>,
    /// Position state after processing each bar.
    pub states: Vec<PositionState>,
    /// First bar on which a decision was taken.
    pub start_idx: usize,
}

impl SignalRun {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bare signal column.
    pub fn signals(&self) -> Vec<i8> {
        self.records.iter().map(|r| r.signal).collect()
    }

    /// State after the last bar.
    pub fn final_state(&self) -> PositionState {
        self.states.last().copied().unwrap_or_default()
    }

    pub fn count(&self, trade_type: TradeType) -> usize {
        self.records
            .iter()
            .filter(|r| r.trade_type == trade_type)
            .count()
    }

    /// Records that change the position.
    pub fn transitions(&self) -> impl Iterator<Item = &SignalRecord> {
        self.records.iter().filter(|r| !r.is_hold())
    }
}

/// A configured engine. Holds no per-run state: each call to
/// [`SignalEngine::run`] starts from a fresh flat position.
pub struct SignalEngine {
    config: StrategyConfig,
    filters: Vec<Box<dyn BarFilter>>,
    pipeline: IndicatorPipeline,
}

impl std::fmt::Debug for SignalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalEngine")
            .field("config", &self.config)
            .field("filters", &self.filters.iter().map(|x| x.name()).collect::<Vec<_>>())
            .field("indicators", &self.pipeline.names())
            .finish()
    }
}

impl SignalEngine {
    /// Validate the config and assemble filters and indicators.
    pub fn new(config: StrategyConfig) -> Result<Self, EngineError> {
        let filters = build_filters(&config)?;
        let pipeline =
            IndicatorPipeline::new(config.atr_period, &filters).with_min_warm_up(config.warm_up());
        Ok(Self {
            config,
            filters,
            pipeline,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &IndicatorPipeline {
        &self.pipeline
    }

    pub fn warm_up(&self) -> usize {
        self.pipeline.warm_up()
    }

    /// Index of the first bar the walk decides on. Never 0: the adverse
    /// counter compares against the previous close.
    pub fn start_index(&self) -> usize {
        self.warm_up().max(1)
    }

    /// Compute indicators and walk every bar.
    pub fn run(&self, bars: &[Bar]) -> Result<SignalRun, EngineError> {
        let frames = self.pipeline.compute(bars)?;
        Ok(self.walk(&frames))
    }

    /// Walk precomputed frames from a flat position.
    pub fn walk(&self, frames: &IndicatorFrames<'_>) -> SignalRun {
        let n = frames.len();
        let start_idx = self.start_index().min(n);
        let mut records = Vec::with_capacity(n);
        let mut states = Vec::with_capacity(n);

        let mut state = PositionState::flat();
        for i in 0..start_idx {
            records.push(SignalRecord::hold(i));
            states.push(state);
        }

        for i in start_idx..n {
            let (next, record) = self.step(&state, &frames.view(i));
            if !record.is_hold() {
                debug!(
                    index = i,
                    trade_type = %record.trade_type,
                    signal = record.signal,
                    trailing_stop = next.trailing_stop,
                    "position transition"
                );
            }
            state = next;
            records.push(record);
            states.push(state);
        }

        SignalRun {
            records,
            states,
            start_idx,
        }
    }

    /// Decide one bar.
    pub fn step(&self, state: &PositionState, view: &FrameView<'_>) -> (PositionState, SignalRecord) {
        let index = view.index();
        let hold = (*state, SignalRecord::hold(index));

        let Some(atr) = view.value(self.pipeline.atr_key()) else {
            return hold;
        };
        let Some(reading) = evaluate_all(&self.filters, view) else {
            return hold;
        };

        let bar = view.bar();
        let close = bar.close;
        let stop_distance = atr * self.config.trailing_stop_multiplier;
        let long_entry = reading.long_entry && bar.is_bullish();
        let short_entry = reading.short_entry && bar.is_bearish();

        let emit = |next: PositionState, signal: i8, trade_type: TradeType| {
            (
                next,
                SignalRecord {
                    index,
                    signal,
                    trade_type,
                },
            )
        };

        match state.side {
            Side::Flat => {
                if long_entry {
                    emit(PositionState::open(Side::Long, close, stop_distance), 1, TradeType::Long)
                } else if short_entry {
                    emit(PositionState::open(Side::Short, close, stop_distance), -1, TradeType::Short)
                } else {
                    hold
                }
            }
            Side::Long | Side::Short => {
                let is_long = state.side == Side::Long;
                let mut next = *state;
                if let Some(prev) = view.prev_bar() {
                    next.record_close(close, prev.close);
                }

                let (reverse, exit_signal) = if is_long {
                    (short_entry, reading.long_exit)
                } else {
                    (long_entry, reading.short_exit)
                };

                if self.config.allow_reversal && reverse {
                    let side = state.side.opposite();
                    let (signal, trade_type) = if is_long {
                        (-2, TradeType::ReverseLongToShort)
                    } else {
                        (2, TradeType::ReverseShortToLong)
                    };
                    return emit(PositionState::open(side, close, stop_distance), signal, trade_type);
                }

                if exit_signal
                    || next.consecutive_adverse_closes >= self.config.num_wrong_limit
                    || next.stop_breached(close)
                {
                    let signal = if is_long { -1 } else { 1 };
                    return emit(PositionState::flat(), signal, TradeType::Close);
                }

                let proposed = if is_long {
                    close - stop_distance
                } else {
                    close + stop_distance
                };
                next.ratchet(proposed);
                (next, SignalRecord::hold(index))
            }
        }
    }
}
