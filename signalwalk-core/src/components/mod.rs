//! Component traits for the signal engine.
//!
//! Two seams:
//! - Indicator: a causal numeric series precomputed from bars
//! - Bar filter: a per-bar predicate voting on entries and exits
//!
//! Position handling lives in the engine, not in components.

pub mod filter;
pub mod indicator;

pub use filter::{build_filters, evaluate_all, BarFilter, FilterReading};
pub use indicator::{FrameView, Indicator, IndicatorValues};
