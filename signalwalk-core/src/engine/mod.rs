//! Signal engine: indicator precompute and the per-bar position walk.
//!
//! The walk is strictly sequential: bar i depends on the state left by bar
//! i-1. Indicator series are independent of each other and are computed in
//! parallel before the walk starts.

pub mod pipeline;
pub mod state_machine;

pub use pipeline::{IndicatorFrames, IndicatorPipeline};
pub use state_machine::{SignalEngine, SignalRun};
