//! SignalWalk Runner: config files, bar loading, single-run orchestration, export.
//!
//! This crate builds on `signalwalk-core` to provide:
//! - TOML run configuration (data source, strategy preset or custom config)
//! - CSV bar loading with data-quality checks and a synthetic fallback
//! - Single-run orchestration with optional causality replay
//! - JSON / CSV / Markdown artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ConfigError, DataSection, OutputSection, RunConfig, StrategySection};
pub use data_loader::{
    generate_synthetic_bars, load_csv, read_csv, synthetic, LoadError, LoadedBars,
};
pub use export::{
    export_json, export_signals_csv, generate_report, import_json, load_artifacts, save_artifacts,
};
pub use runner::{load_data, run_from_config, run_signals, RunError, SignalReport, SCHEMA_VERSION};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn signal_report_is_send_sync() {
        assert_send::<SignalReport>();
        assert_sync::<SignalReport>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<StrategySection>();
        assert_sync::<StrategySection>();
    }

    #[test]
    fn loaded_bars_is_send_sync() {
        assert_send::<LoadedBars>();
        assert_sync::<LoadedBars>();
    }
}
