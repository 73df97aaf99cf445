//! normbench: raw-vs-normalized MySQL query benchmark.
//!
//! Usage:
//!   normbench --raw                  # measure Q1-Q5 across the raw tables
//!   normbench --normalized           # index + measure the normalized schema
//!   normbench                        # both measurement workloads
//!   normbench --setup-schema         # one-shot: populate the normalized schema
//!   normbench --export results/      # write CSV/JSON under a directory
//!
//! Connection parameters come from MYSQL_* environment variables, with
//! host/port/user/database overridable on the command line.

use clap::Parser;
use colored::Colorize;
use normbench::adapters::mysql_adapter::MySqlAdapter;
use normbench::config::ConnectionConfig;
use normbench::{report, schema, workload, BenchResult, RunStamp};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "normbench", about = "MySQL raw-vs-normalized schema benchmark")]
struct Cli {
    /// Measure the raw wide tables (1MB/10MB/100MB).
    #[arg(long)]
    raw: bool,

    /// Measure the normalized schema (indexes provisioned first).
    #[arg(long)]
    normalized: bool,

    /// Populate the normalized schema from the 100MB raw table. One-shot:
    /// rerunning duplicates Employment rows.
    #[arg(long)]
    setup_schema: bool,

    /// Skip index provisioning before the normalized run.
    #[arg(long)]
    skip_indexes: bool,

    /// Directory for result files.
    #[arg(long, default_value = ".")]
    export: PathBuf,

    /// Database host (overrides MYSQL_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Database port (overrides MYSQL_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Database user (overrides MYSQL_USER).
    #[arg(long)]
    user: Option<String>,

    /// Database name (overrides MYSQL_DATABASE).
    #[arg(long)]
    database: Option<String>,
}

fn main() -> BenchResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut cfg = ConnectionConfig::from_env();
    if let Some(host) = cli.host.clone() {
        cfg.host = host;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(user) = cli.user.clone() {
        cfg.user = user;
    }
    if let Some(database) = cli.database.clone() {
        cfg.database = database;
    }

    // No selection flags means both measurement workloads.
    let run_both = !cli.raw && !cli.normalized && !cli.setup_schema;
    let run_raw = cli.raw || run_both;
    let run_normalized = cli.normalized || run_both;

    let mut db = match MySqlAdapter::connect(&cfg) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            eprintln!(
                "  Check MYSQL_HOST/MYSQL_USER/MYSQL_PASSWORD/MYSQL_DATABASE and that the \
                 server is reachable."
            );
            return Err(e);
        }
    };

    if cli.setup_schema {
        println!(
            "{}",
            format!("▶ Normalizing from {} (one-shot)", schema::DEFAULT_RAW_SOURCE)
                .bold()
                .green()
        );
        schema::normalize_from(&mut db, schema::DEFAULT_RAW_SOURCE)?;
        println!("  Normalization and load complete.");
    }

    if !run_raw && !run_normalized {
        return Ok(());
    }

    std::fs::create_dir_all(&cli.export)?;
    let stamp = RunStamp::capture();
    println!("  Host: {}  Run: {}", stamp.host, stamp.timestamp);

    if run_raw {
        let records = workload::run_raw(&mut db, workload::RAW_SOURCES, workload::RAW_QUERIES, &stamp);
        report::print_summary("Raw tables", &records);
        report::write_raw_csv(&records, &cli.export.join(report::RAW_RESULTS_CSV))?;
        report::export_json(&records, &cli.export.join(report::RAW_RESULTS_JSON))?;
    }

    if run_normalized {
        if !cli.skip_indexes {
            println!("\n{}", "▶ Provisioning indexes (best-effort)".bold().green());
            let applied = schema::provision_indexes(&mut db, schema::INDEX_STATEMENTS);
            println!(
                "  {} of {} index statements applied",
                applied,
                schema::INDEX_STATEMENTS.len()
            );
        }

        let records = workload::run_normalized(&mut db, workload::NORMALIZED_QUERIES, &stamp);
        report::print_summary("Normalized schema", &records);
        report::write_normalized_csv(&records, &cli.export.join(report::NORMALIZED_RESULTS_CSV))?;
        report::export_json(&records, &cli.export.join(report::NORMALIZED_RESULTS_JSON))?;
    }

    Ok(())
}
