//! Domain types for signalwalk

pub mod bar;
pub mod position;
pub mod signal;

pub use bar::Bar;
pub use position::{PositionState, Side};
pub use signal::{SignalRecord, TradeType};
