//! Result serialization: CSV for the plotting step, plus JSON export and a
//! terminal comparison table.
//!
//! The CSV column layout is a contract with the downstream plots (medians as
//! 6-decimal strings, empty on failure; samples semicolon-joined), so the
//! writers here spell the fields out instead of leaning on serde.

use crate::{BenchError, BenchResult, MeasurementRecord};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::Path;

/// Default result files, next to each other under the export directory.
pub const RAW_RESULTS_CSV: &str = "results_all_tables.csv";
pub const RAW_RESULTS_JSON: &str = "results_all_tables.json";
pub const NORMALIZED_RESULTS_CSV: &str = "results_normalized_100MB.csv";
pub const NORMALIZED_RESULTS_JSON: &str = "results_normalized_100MB.json";

/// Header of the multi-source (raw tables) result file.
pub const RAW_HEADER: &[&str] = &[
    "table", "size_mb", "query", "median_s", "samples", "timestamp", "host",
];
/// Header of the single-source (normalized) result file; source and size
/// columns are omitted since there is exactly one implicit source.
pub const NORMALIZED_HEADER: &[&str] = &["query", "median_s", "samples", "timestamp", "host"];

/// 6-decimal median field, empty when the measurement failed.
pub fn format_median(median_s: Option<f64>) -> String {
    median_s.map(|m| format!("{:.6}", m)).unwrap_or_default()
}

/// Semicolon-joined 6-decimal samples, in execution order, empty on failure.
pub fn format_samples(samples: &[f64]) -> String {
    samples
        .iter()
        .map(|s| format!("{:.6}", s))
        .collect::<Vec<_>>()
        .join(";")
}

fn output_err(path: &Path, e: impl std::fmt::Display) -> BenchError {
    BenchError::Output {
        path: path.display().to_string(),
        cause: e.to_string(),
    }
}

/// Write raw-workload records as CSV, overwriting `path`.
pub fn write_raw_csv(records: &[MeasurementRecord], path: &Path) -> BenchResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| output_err(path, e))?;

    wtr.write_record(RAW_HEADER).map_err(|e| output_err(path, e))?;
    for r in records {
        let median = format_median(r.median_s);
        let samples = format_samples(&r.samples);
        wtr.write_record([
            r.table.as_str(),
            r.size_mb.as_str(),
            r.query.as_str(),
            median.as_str(),
            samples.as_str(),
            r.timestamp.as_str(),
            r.host.as_str(),
        ])
        .map_err(|e| output_err(path, e))?;
    }

    wtr.flush().map_err(|e| output_err(path, e))?;
    println!("  CSV saved to {}", path.display());
    Ok(())
}

/// Write normalized-workload records as CSV, overwriting `path`.
pub fn write_normalized_csv(records: &[MeasurementRecord], path: &Path) -> BenchResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| output_err(path, e))?;

    wtr.write_record(NORMALIZED_HEADER)
        .map_err(|e| output_err(path, e))?;
    for r in records {
        let median = format_median(r.median_s);
        let samples = format_samples(&r.samples);
        wtr.write_record([
            r.query.as_str(),
            median.as_str(),
            samples.as_str(),
            r.timestamp.as_str(),
            r.host.as_str(),
        ])
        .map_err(|e| output_err(path, e))?;
    }

    wtr.flush().map_err(|e| output_err(path, e))?;
    println!("  CSV saved to {}", path.display());
    Ok(())
}

/// Dump the full records, raw samples included, as pretty JSON.
pub fn export_json(records: &[MeasurementRecord], path: &Path) -> BenchResult<()> {
    let json = serde_json::to_string_pretty(records).map_err(|e| output_err(path, e))?;
    std::fs::write(path, json).map_err(|e| output_err(path, e))?;
    println!("  JSON saved to {}", path.display());
    Ok(())
}

/// Print a per-query median comparison across sources, fastest source green.
pub fn print_summary(title: &str, records: &[MeasurementRecord]) {
    if records.is_empty() {
        return;
    }

    // First-seen order on both axes.
    let mut sources: Vec<&str> = Vec::new();
    let mut queries: Vec<&str> = Vec::new();
    for r in records {
        if !sources.contains(&r.table.as_str()) {
            sources.push(&r.table);
        }
        if !queries.contains(&r.query.as_str()) {
            queries.push(&r.query);
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);

    let mut header = vec!["Query".to_string()];
    header.extend(sources.iter().map(|s| s.to_string()));
    table.set_header(header);

    for q in &queries {
        let medians: Vec<Option<f64>> = sources
            .iter()
            .map(|s| {
                records
                    .iter()
                    .find(|r| r.query == *q && r.table == *s)
                    .and_then(|r| r.median_s)
            })
            .collect();
        let best = medians
            .iter()
            .flatten()
            .fold(f64::INFINITY, |acc, &m| acc.min(m));

        let mut row = vec![Cell::new(q)];
        for m in &medians {
            match m {
                Some(v) if *v <= best => row.push(Cell::new(format!("{:.6}s", v)).fg(Color::Green)),
                Some(v) => row.push(Cell::new(format!("{:.6}s", v))),
                None => row.push(Cell::new("-")),
            }
        }
        table.add_row(row);
    }

    println!("\n{}", format!("━━━ {} ━━━", title).bold().cyan());
    println!("{table}");
}
