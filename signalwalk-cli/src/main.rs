//! SignalWalk CLI: run strategies over daily bars and check them for lookahead.
//!
//! Commands:
//! - `run`: generate a signal tape from a TOML config file or named preset
//! - `validate`: replay every non-zero signal on its prefix, exit 1 on mismatch
//! - `presets`: list the built-in strategy presets

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use signalwalk_core::{StrategyPreset, TradeType};
use signalwalk_runner::{
    run_from_config, save_artifacts, DataSection, OutputSection, RunConfig, SignalReport,
    StrategySection,
};

#[derive(Parser)]
#[command(
    name = "signalwalk",
    about = "SignalWalk CLI: causal bar-by-bar signal generation"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate signals from a TOML config file or named preset.
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Replay every non-zero signal on its prefix after the run.
        #[arg(long, default_value_t = false)]
        validate: bool,

        /// Output directory for the artifact bundle.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Run the causality check and exit non-zero if any signal used future bars.
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the built-in strategy presets.
    Presets,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset: ema_macd, volume_spike, volume_rsi, sma_rsi.
    #[arg(long)]
    preset: Option<String>,

    /// CSV file with date,open,high,low,close,volume columns (with --preset).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Generate this many synthetic bars instead of reading a file (with --preset).
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic bars.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Symbol label for reports.
    #[arg(long)]
    symbol: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            source,
            validate,
            output_dir,
            no_save,
        } => run_cmd(source, validate, output_dir, no_save),
        Commands::Validate { source } => validate_cmd(source),
        Commands::Presets => {
            list_presets();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_run_config(source: SourceArgs) -> Result<RunConfig> {
    if source.config.is_some() && source.preset.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }

    if let Some(path) = source.config {
        if source.data.is_some() || source.synthetic.is_some() {
            bail!("--data and --synthetic are set in the config file when --config is used");
        }
        let mut config = RunConfig::from_file(&path)?;
        if let Some(symbol) = source.symbol {
            config.data.symbol = symbol;
        }
        debug!(path = %path.display(), "loaded run config");
        return Ok(config);
    }

    let Some(name) = source.preset else {
        bail!("one of --config or --preset is required");
    };
    let preset: StrategyPreset = name.parse()?;

    let config = RunConfig {
        data: DataSection {
            path: source.data,
            symbol: source.symbol.unwrap_or_else(|| "UNKNOWN".into()),
            synthetic_bars: source.synthetic,
            seed: source.seed,
        },
        strategy: StrategySection::Preset { preset },
        output: OutputSection::default(),
        validate: false,
    };
    config.validate()?;
    Ok(config)
}

fn run_cmd(
    source: SourceArgs,
    validate: bool,
    output_dir: Option<PathBuf>,
    no_save: bool,
) -> Result<()> {
    let mut config = build_run_config(source)?;
    config.validate |= validate;
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }

    let report = run_from_config(&config)?;
    print_summary(&report);

    if !no_save {
        let run_dir = save_artifacts(&report, &config.output.dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn validate_cmd(source: SourceArgs) -> Result<()> {
    let mut config = build_run_config(source)?;
    config.validate = true;

    let report = run_from_config(&config)?;
    let Some(causality) = &report.causality else {
        bail!("causality check did not run");
    };

    println!(
        "{} on {}: replayed {} signals",
        report.label, report.symbol, causality.checked
    );
    if causality.is_clean() {
        println!("OK: no lookahead detected");
        return Ok(());
    }

    println!("{:<8} {:>10} {:>10}", "Bar", "Production", "Replayed");
    println!("{}", "-".repeat(30));
    for f in &causality.findings {
        let replayed = f
            .replayed
            .map(|r| r.to_string())
            .unwrap_or_else(|| "n/a".into());
        println!("{:<8} {:>10} {:>10}", f.index, f.production, replayed);
    }
    eprintln!("FAIL: {} lookahead findings", causality.findings.len());
    std::process::exit(1);
}

fn list_presets() {
    println!("{:<14} Strategy", "Preset");
    println!("{}", "-".repeat(60));
    for preset in StrategyPreset::ALL {
        println!("{:<14} {}", preset.name(), preset.to_config().label());
    }
}

fn print_summary(report: &SignalReport) {
    println!();
    println!("=== Signal Run ===");
    println!("Symbol:       {}", report.symbol);
    println!("Period:       {} to {}", report.start_date, report.end_date);
    println!(
        "Bars:         {} ({} warm-up)",
        report.bar_count, report.warm_up
    );
    println!("Strategy:     {}", report.label);
    println!("Config hash:  {}", report.config_hash);
    if report.has_synthetic {
        println!("Data:         SYNTHETIC");
    }
    println!();
    println!("--- Signals ---");
    for tt in TradeType::ALL {
        println!("{:<24}{}", format!("{tt}:"), report.count(tt));
    }
    println!("Open at end:            {:?}", report.final_side);
    if let Some(c) = &report.causality {
        println!();
        println!("--- Causality ---");
        println!("Replayed:     {}", c.checked);
        println!("Findings:     {}", c.findings.len());
    }
    for w in &report.data_quality_warnings {
        println!("Warning: {w}");
    }
    println!();
}
