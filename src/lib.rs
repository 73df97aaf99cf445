//! Shared types and error handling for normbench.

pub mod adapters;
pub mod config;
pub mod measure;
pub mod report;
pub mod schema;
pub mod workload;

use crate::measure::Measurement;
use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────────
// Error type
// ────────────────────────────────────────────────────────────────────────────────

pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug)]
pub enum BenchError {
    /// The server could not be reached at all. Fatal to the run.
    Connection(String),
    /// One statement failed on the server. The workload runner recovers from
    /// these; setup paths propagate them.
    Query { sql: String, cause: String },
    /// A result file could not be written.
    Output { path: String, cause: String },
    Config(String),
    Io(std::io::Error),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchError::Connection(s) => write!(f, "Connection error: {}", s),
            BenchError::Query { sql, cause } => write!(f, "Query error: {} [{}]", cause, sql),
            BenchError::Output { path, cause } => write!(f, "Output error: {}: {}", path, cause),
            BenchError::Config(s) => write!(f, "Config error: {}", s),
            BenchError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<std::io::Error> for BenchError {
    fn from(e: std::io::Error) -> Self {
        BenchError::Io(e)
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Run stamp
// ────────────────────────────────────────────────────────────────────────────────

/// Timestamp and host captured once at run start; every record of one run
/// carries the same stamp.
#[derive(Debug, Clone, Serialize)]
pub struct RunStamp {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub host: String,
}

impl RunStamp {
    pub fn capture() -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            host: machine_name(),
        }
    }
}

fn machine_name() -> String {
    std::env::var("BENCH_MACHINE_NAME")
        .or_else(|_| {
            std::process::Command::new("hostname")
                .arg("-s")
                .output()
                .ok()
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

// ────────────────────────────────────────────────────────────────────────────────
// Measurement records
// ────────────────────────────────────────────────────────────────────────────────

/// One (source, query) outcome. Every attempted pair produces exactly one
/// record, failed pairs included, so a run's output is a complete audit trail
/// of what was tried.
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementRecord {
    /// Raw table name, or "normalized".
    pub table: String,
    /// Nominal dataset size label in MB; grouping key for plots.
    pub size_mb: String,
    pub query: String,
    /// `None` when any execution of the pair failed.
    pub median_s: Option<f64>,
    /// Timed samples in execution order; empty on failure.
    pub samples: Vec<f64>,
    pub timestamp: String,
    pub host: String,
}

impl MeasurementRecord {
    pub fn measured(
        table: &str,
        size_mb: &str,
        query: &str,
        m: Measurement,
        stamp: &RunStamp,
    ) -> Self {
        Self {
            table: table.to_string(),
            size_mb: size_mb.to_string(),
            query: query.to_string(),
            median_s: Some(m.median_s),
            samples: m.samples,
            timestamp: stamp.timestamp.clone(),
            host: stamp.host.clone(),
        }
    }

    pub fn failed(table: &str, size_mb: &str, query: &str, stamp: &RunStamp) -> Self {
        Self {
            table: table.to_string(),
            size_mb: size_mb.to_string(),
            query: query.to_string(),
            median_s: None,
            samples: Vec::new(),
            timestamp: stamp.timestamp.clone(),
            host: stamp.host.clone(),
        }
    }
}
