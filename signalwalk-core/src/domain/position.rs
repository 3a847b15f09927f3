//! Single-slot position state owned by the state machine.

use serde::{Deserialize, Serialize};

/// Directional exposure held by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Flat,
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Flat => Self::Flat,
            Self::Long => Self::Short,
            Self::Short => Self::Long,
        }
    }
}

/// The engine's only mutable state.
///
/// At most one of these is live per pass. It resets to [`PositionState::flat`]
/// at engine start and whenever a position fully closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub side: Side,
    pub trailing_stop: f64,
    pub consecutive_adverse_closes: u32,
}

impl Default for PositionState {
    fn default() -> Self {
        Self::flat()
    }
}

impl PositionState {
    pub fn flat() -> Self {
        Self {
            side: Side::Flat,
            trailing_stop: 0.0,
            consecutive_adverse_closes: 0,
        }
    }

    /// Fresh position opened at `close` with the stop `stop_distance` away.
    pub fn open(side: Side, close: f64, stop_distance: f64) -> Self {
        let trailing_stop = match side {
            Side::Long => close - stop_distance,
            Side::Short => close + stop_distance,
            Side::Flat => 0.0,
        };
        Self {
            side,
            trailing_stop,
            consecutive_adverse_closes: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.side == Side::Flat
    }

    /// Ratchet the stop toward `proposed`. Stops tighten, never loosen:
    /// longs take the max, shorts take the min.
    pub fn ratchet(&mut self, proposed: f64) {
        self.trailing_stop = match self.side {
            Side::Long => self.trailing_stop.max(proposed),
            Side::Short => self.trailing_stop.min(proposed),
            Side::Flat => self.trailing_stop,
        };
    }

    /// True when `close` has crossed the stop against the position.
    pub fn stop_breached(&self, close: f64) -> bool {
        match self.side {
            Side::Long => close < self.trailing_stop,
            Side::Short => close > self.trailing_stop,
            Side::Flat => false,
        }
    }

    /// Update the adverse-close counter: a close at or beyond the previous
    /// close in the losing direction extends the streak, anything else resets it.
    pub fn record_close(&mut self, close: f64, prev_close: f64) {
        let adverse = match self.side {
            Side::Long => close <= prev_close,
            Side::Short => close >= prev_close,
            Side::Flat => false,
        };
        if adverse {
            self.consecutive_adverse_closes += 1;
        } else {
            self.consecutive_adverse_closes = 0;
        }
    }
}
