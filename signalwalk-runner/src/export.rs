//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: the signal tape (bars + signal + trade_type), the input format
//!   downstream trade evaluation reads
//! - **Markdown**: human-readable single-run report
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use signalwalk_core::domain::{Bar, SignalRecord, TradeType};

use crate::runner::{SignalReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SignalReport` to pretty JSON.
pub fn export_json(report: &SignalReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize SignalReport to JSON")
}

/// Deserialize a `SignalReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SignalReport> {
    let report: SignalReport =
        serde_json::from_str(json).context("failed to deserialize SignalReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the signal tape: one row per bar.
///
/// Columns: index, date, open, high, low, close, volume, signal, trade_type
pub fn export_signals_csv(bars: &[Bar], records: &[SignalRecord]) -> Result<String> {
    if bars.len() != records.len() {
        bail!(
            "signal tape has {} records for {} bars",
            records.len(),
            bars.len()
        );
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "signal",
        "trade_type",
    ])?;

    for (bar, rec) in bars.iter().zip(records) {
        wtr.write_record([
            &rec.index.to_string(),
            &bar.date.to_string(),
            &format!("{:.6}", bar.open),
            &format!("{:.6}", bar.high),
            &format!("{:.6}", bar.low),
            &format!("{:.6}", bar.close),
            &format!("{}", bar.volume),
            &rec.signal.to_string(),
            rec.trade_type.as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single run.
///
/// Creates a directory named `{symbol}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json`: the full `SignalReport`
/// - `signals.csv`: the signal tape
/// - `report.md`: human-readable summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &SignalReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    // manifest.json
    let json = export_json(report)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    // signals.csv
    let signals_csv = export_signals_csv(&report.bars, &report.records)?;
    std::fs::write(run_dir.join("signals.csv"), &signals_csv)?;

    // report.md
    std::fs::write(run_dir.join("report.md"), generate_report(report))?;

    Ok(run_dir)
}

/// Load a `SignalReport` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<SignalReport> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single run.
pub fn generate_report(report: &SignalReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Signal Report\n\n");

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", report.symbol));
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        report.start_date, report.end_date
    ));
    md.push_str(&format!(
        "| Bars | {} ({} warm-up) |\n",
        report.bar_count, report.warm_up
    ));
    md.push_str(&format!("| Strategy | {} |\n", report.label));
    md.push_str(&format!("| Config Hash | {} |\n", report.config_hash));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    if report.has_synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    // Signals
    md.push_str("## Signals\n\n");
    md.push_str("| Trade Type | Count |\n");
    md.push_str("| --- | --- |\n");
    for tt in TradeType::ALL {
        md.push_str(&format!("| {} | {} |\n", tt, report.count(tt)));
    }
    md.push_str(&format!("\nOpen at end: {:?}\n\n", report.final_side));

    // Causality
    if let Some(c) = &report.causality {
        md.push_str("## Causality Check\n\n");
        md.push_str(&format!("Replayed {} non-zero signals.\n\n", c.checked));
        if c.is_clean() {
            md.push_str("No lookahead detected.\n\n");
        } else {
            md.push_str("| Bar | Production | Replayed |\n");
            md.push_str("| --- | --- | --- |\n");
            for f in &c.findings {
                let replayed = f
                    .replayed
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "n/a".into());
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    f.index, f.production, replayed
                ));
            }
            md.push('\n');
        }
    }

    // Warnings
    if !report.data_quality_warnings.is_empty() {
        md.push_str("## Data Quality Warnings\n\n");
        for w in &report.data_quality_warnings {
            md.push_str(&format!("- {w}\n"));
        }
        md.push('\n');
    }

    md
}
