//! Per-bar signal output consumed by the trade evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label attached to every emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    Hold,
    Long,
    Short,
    Close,
    ReverseLongToShort,
    ReverseShortToLong,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hold => "HOLD",
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Close => "CLOSE",
            Self::ReverseLongToShort => "REVERSE_LONG_TO_SHORT",
            Self::ReverseShortToLong => "REVERSE_SHORT_TO_LONG",
        }
    }

    /// True for transitions that leave the engine holding a position.
    pub fn is_opening(&self) -> bool {
        matches!(
            self,
            Self::Long | Self::Short | Self::ReverseLongToShort | Self::ReverseShortToLong
        )
    }

    pub fn is_reversal(&self) -> bool {
        matches!(self, Self::ReverseLongToShort | Self::ReverseShortToLong)
    }

    pub const ALL: [TradeType; 6] = [
        Self::Hold,
        Self::Long,
        Self::Short,
        Self::Close,
        Self::ReverseLongToShort,
        Self::ReverseShortToLong,
    ];
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row per input bar.
///
/// `signal` is the exposure delta in units: ±1 opens or closes one unit,
/// ±2 is an atomic close-and-reopen in the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub index: usize,
    pub signal: i8,
    pub trade_type: TradeType,
}

impl SignalRecord {
    pub fn hold(index: usize) -> Self {
        Self {
            index,
            signal: 0,
            trade_type: TradeType::Hold,
        }
    }

    pub fn is_hold(&self) -> bool {
        self.signal == 0
    }
}
