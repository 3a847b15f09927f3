//! Bar loading for the runner.
//!
//! Two sources:
//! 1. CSV file with `date,open,high,low,close,volume` columns
//! 2. Synthetic bars from a seeded random walk (developer/demo mode)
//!
//! Loaded series are checked before any signal work: dates must strictly
//! increase and every value must be finite. Bars whose OHLC relationship is
//! inconsistent (high below close, etc.) are kept but reported.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use signalwalk_core::domain::Bar;
use signalwalk_core::fingerprint::DatasetHash;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unrecognized date '{value}' (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)")]
    BadDate { row: usize, value: String },

    #[error("row {row}: date {date} is not after the previous bar ({previous})")]
    NotIncreasing {
        row: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("row {row} ({date}): non-finite price or volume")]
    VoidBar { row: usize, date: NaiveDate },

    #[error("no bars in input")]
    Empty,
}

/// Bars plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// BLAKE3 over all bar values.
    pub dataset_hash: DatasetHash,
    pub synthetic: bool,
    /// Non-fatal data quality issues found while loading.
    pub warnings: Vec<String>,
}

impl LoadedBars {
    fn new(symbol: &str, bars: Vec<Bar>, synthetic: bool, warnings: Vec<String>) -> Self {
        let dataset_hash = DatasetHash::of(&bars);
        Self {
            symbol: symbol.to_string(),
            bars,
            dataset_hash,
            synthetic,
            warnings,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "timestamp", alias = "Date", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Load bars from a CSV file.
pub fn load_csv(path: &Path, symbol: &str) -> Result<LoadedBars, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = read_csv(file, symbol)?;
    info!(
        symbol,
        path = %path.display(),
        bars = loaded.len(),
        warnings = loaded.warnings.len(),
        "loaded bars"
    );
    Ok(loaded)
}

/// Parse and check bars from any CSV reader. Extra columns are ignored.
pub fn read_csv<R: Read>(reader: R, symbol: &str) -> Result<LoadedBars, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars: Vec<Bar> = Vec::new();
    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = i + 1;
        let rec = result?;
        let date = parse_date(&rec.date).ok_or_else(|| LoadError::BadDate {
            row,
            value: rec.date.clone(),
        })?;
        bars.push(Bar {
            date,
            open: rec.open,
            high: rec.high,
            low: rec.low,
            close: rec.close,
            volume: rec.volume,
        });
    }

    let warnings = check_bars(&bars)?;
    for w in &warnings {
        warn!(symbol, "{w}");
    }
    Ok(LoadedBars::new(symbol, bars, false, warnings))
}

/// Reject series the engine cannot walk; collect softer issues as warnings.
pub fn check_bars(bars: &[Bar]) -> Result<Vec<String>, LoadError> {
    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut warnings = Vec::new();
    let mut previous: Option<NaiveDate> = None;
    for (i, bar) in bars.iter().enumerate() {
        let row = i + 1;
        if let Some(prev) = previous {
            if bar.date <= prev {
                return Err(LoadError::NotIncreasing {
                    row,
                    date: bar.date,
                    previous: prev,
                });
            }
        }
        previous = Some(bar.date);

        let values = [bar.open, bar.high, bar.low, bar.close, bar.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LoadError::VoidBar {
                row,
                date: bar.date,
            });
        }
        if !bar.is_sane() {
            warnings.push(format!(
                "row {row} ({}): inconsistent OHLC (o={}, h={}, l={}, c={})",
                bar.date, bar.open, bar.high, bar.low, bar.close
            ));
        }
        if bar.volume < 0.0 {
            warnings.push(format!("row {row} ({}): negative volume {}", bar.date, bar.volume));
        }
    }

    Ok(warnings)
}

/// Deterministic synthetic series tagged as such.
pub fn synthetic(symbol: &str, n: usize, seed: u64) -> LoadedBars {
    warn!(symbol, bars = n, seed, "generating synthetic data; results will be tagged as synthetic");
    LoadedBars::new(symbol, generate_synthetic_bars(n, seed), true, Vec::new())
}

/// Random walk from 100.0 on weekdays starting 2020-01-02, with occasional
/// volume bursts so volume-spike strategies have something to react to.
pub fn generate_synthetic_bars(n: usize, seed: u64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut current = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap_or_default();

    while bars.len() < n {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price * (1.0 + rng.gen_range(-0.005..0.005));
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let base_volume: f64 = rng.gen_range(500_000.0..1_500_000.0);
        let volume = if rng.gen_bool(0.08) {
            base_volume * rng.gen_range(3.0..6.0)
        } else {
            base_volume
        };

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume: volume.round(),
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
