//! Query workloads and the source × query runner.
//!
//! Queries live in ordered `const` slices rather than maps: iteration order
//! fixes the order of records in the result file, so it must not hang off a
//! hash map's whims. The identifiers Q1-Q5 are shared between the raw and
//! normalized sets, which is what lets the plots compare the two schemas
//! query by query.

use crate::adapters::QueryExecutor;
use crate::measure;
use crate::{MeasurementRecord, RunStamp};
use colored::Colorize;
use std::io::Write;
use tracing::warn;

/// Raw wide-table variants, in run order: (table name, nominal size in MB).
pub const RAW_SOURCES: &[(&str, &str)] = &[
    ("raw_data_1MB", "1"),
    ("raw_data_10MB", "10"),
    ("raw_data_100MB", "100"),
];

/// Source identifier carried by the normalized workload's records.
pub const NORMALIZED_SOURCE: &str = "normalized";
/// The normalized schema is populated from the 100MB raw table.
pub const NORMALIZED_SIZE_MB: &str = "100";

/// Queries against the raw wide tables: (identifier, template). Templates
/// take the table name at `{table}`. Exact matches only, no LOWER/LIKE.
pub const RAW_QUERIES: &[(&str, &str)] = &[
    ("Q1", "SELECT DISTINCT PersonName, BirthDate FROM {table};"),
    (
        "Q2",
        "SELECT DISTINCT PersonName, SchoolName, SchoolCampus FROM {table} \
         WHERE StillWorking = 'yes';",
    ),
    (
        "Q3",
        "SELECT PersonName, JobTitle FROM {table} \
         WHERE JobTitle = 'Assistant Professor' \
         AND SchoolName = 'University of Massachusetts' \
         AND SchoolCampus = 'Dartmouth' \
         AND StillWorking = 'yes';",
    ),
    (
        "Q4",
        "SELECT SchoolCampus, COUNT(DISTINCT PersonID) AS num_people FROM {table} \
         WHERE EarningsYear = (SELECT MAX(EarningsYear) FROM {table}) \
         AND StillWorking = 'yes' GROUP BY SchoolCampus;",
    ),
    (
        "Q5",
        "SELECT PersonID, PersonName, SUM(Earnings) AS total_earnings FROM {table} \
         GROUP BY PersonID, PersonName;",
    ),
];

/// The same five questions against the normalized schema, joined implicitly
/// (FROM + WHERE only). No substitution point.
pub const NORMALIZED_QUERIES: &[(&str, &str)] = &[
    ("Q1", "SELECT PersonName, BirthDate FROM Person;"),
    (
        "Q2",
        "SELECT DISTINCT p.PersonName, s.SchoolName, e.SchoolCampus \
         FROM Employment e, Person p, School s \
         WHERE e.PersonID = p.PersonID \
         AND e.SchoolID = s.SchoolID \
         AND e.StillWorking = 'yes';",
    ),
    (
        "Q3",
        "SELECT p.PersonName, j.JobTitle \
         FROM Employment e, Person p, Job j, School s \
         WHERE e.PersonID = p.PersonID \
         AND e.JobID = j.JobID \
         AND e.SchoolID = s.SchoolID \
         AND e.StillWorking = 'yes' \
         AND j.JobTitle = 'Assistant Professor' \
         AND s.SchoolName = 'University of Massachusetts' \
         AND e.SchoolCampus = 'Dartmouth';",
    ),
    (
        "Q4",
        "SELECT e.SchoolCampus, COUNT(DISTINCT e.PersonID) AS num_people \
         FROM Employment e \
         WHERE e.StillWorking = 'yes' \
         AND e.EarningsYear = (SELECT MAX(EarningsYear) FROM Employment) \
         GROUP BY e.SchoolCampus;",
    ),
    (
        "Q5",
        "SELECT p.PersonID, p.PersonName, t.total_earnings \
         FROM Person p, \
              (SELECT PersonID, SUM(Earnings) AS total_earnings \
               FROM Employment \
               GROUP BY PersonID) t \
         WHERE p.PersonID = t.PersonID;",
    ),
];

/// Substitute the raw table name into a query template.
pub fn render(template: &str, table: &str) -> String {
    template.replace("{table}", table)
}

/// Measure every (source, query) pair in order. Exactly one record per pair,
/// failures included; a failed pair never aborts the run.
pub fn run_raw(
    db: &mut dyn QueryExecutor,
    sources: &[(&str, &str)],
    queries: &[(&str, &str)],
    stamp: &RunStamp,
) -> Vec<MeasurementRecord> {
    let mut records = Vec::with_capacity(sources.len() * queries.len());

    for &(table, size_mb) in sources {
        println!("\n{}", format!("▶ {} ({}MB)", table, size_mb).bold().green());
        for &(qid, template) in queries {
            let sql = render(template, table);
            records.push(measure_pair(db, table, size_mb, qid, &sql, stamp));
        }
    }

    records
}

/// Measure the normalized query set against its single implicit source.
pub fn run_normalized(
    db: &mut dyn QueryExecutor,
    queries: &[(&str, &str)],
    stamp: &RunStamp,
) -> Vec<MeasurementRecord> {
    let mut records = Vec::with_capacity(queries.len());

    println!(
        "\n{}",
        format!("▶ {} ({}MB)", NORMALIZED_SOURCE, NORMALIZED_SIZE_MB)
            .bold()
            .green()
    );
    for &(qid, sql) in queries {
        records.push(measure_pair(
            db,
            NORMALIZED_SOURCE,
            NORMALIZED_SIZE_MB,
            qid,
            sql,
            stamp,
        ));
    }

    records
}

fn measure_pair(
    db: &mut dyn QueryExecutor,
    table: &str,
    size_mb: &str,
    qid: &str,
    sql: &str,
    stamp: &RunStamp,
) -> MeasurementRecord {
    print!("  {} ... ", qid);
    let _ = std::io::stdout().flush();

    match measure::measure_query(db, sql) {
        Ok(m) => {
            println!("{}", format!("median {:.6}s", m.median_s).cyan());
            MeasurementRecord::measured(table, size_mb, qid, m, stamp)
        }
        Err(e) => {
            println!("{}", "FAILED".red().bold());
            warn!(table, query = qid, error = %e, "measurement failed");
            MeasurementRecord::failed(table, size_mb, qid, stamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::ScriptedConn;
    use crate::measure::REPEATS;

    fn stamp() -> RunStamp {
        RunStamp {
            timestamp: "2025-01-01 12:00:00".to_string(),
            host: "testhost".to_string(),
        }
    }

    #[test]
    fn raw_templates_all_take_a_table_name() {
        for (qid, template) in RAW_QUERIES {
            assert!(template.contains("{table}"), "{} lacks a substitution point", qid);
            assert!(!render(template, "raw_data_1MB").contains("{table}"));
        }
    }

    #[test]
    fn normalized_queries_are_source_independent() {
        for (_, sql) in NORMALIZED_QUERIES {
            assert!(!sql.contains("{table}"));
        }
    }

    #[test]
    fn query_identifiers_match_across_variants() {
        let raw: Vec<&str> = RAW_QUERIES.iter().map(|&(qid, _)| qid).collect();
        let normalized: Vec<&str> = NORMALIZED_QUERIES.iter().map(|&(qid, _)| qid).collect();
        assert_eq!(raw, normalized);
    }

    #[test]
    fn one_record_per_pair_in_iteration_order() {
        let mut conn = ScriptedConn::new();
        let records = run_raw(&mut conn, RAW_SOURCES, RAW_QUERIES, &stamp());

        assert_eq!(records.len(), RAW_SOURCES.len() * RAW_QUERIES.len());

        let mut expected = Vec::new();
        for &(table, _) in RAW_SOURCES {
            for &(qid, _) in RAW_QUERIES {
                expected.push((table.to_string(), qid.to_string()));
            }
        }
        let got: Vec<(String, String)> = records
            .iter()
            .map(|r| (r.table.clone(), r.query.clone()))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn all_records_share_one_stamp() {
        let mut conn = ScriptedConn::new();
        let records = run_raw(&mut conn, RAW_SOURCES, RAW_QUERIES, &stamp());

        assert!(records
            .iter()
            .all(|r| r.timestamp == "2025-01-01 12:00:00" && r.host == "testhost"));
        assert!(records
            .iter()
            .all(|r| r.samples.len() == REPEATS && r.median_s.is_some()));
    }

    #[test]
    fn failing_pair_is_recorded_and_run_continues() {
        // Q3 fails from its first execution on every source; 3 of 15 pairs
        // come back empty, the other 12 are measured.
        let mut conn = ScriptedConn::failing_on("Assistant Professor", 1);
        let records = run_raw(&mut conn, RAW_SOURCES, RAW_QUERIES, &stamp());

        assert_eq!(records.len(), 15);
        for r in &records {
            if r.query == "Q3" {
                assert!(r.median_s.is_none());
                assert!(r.samples.is_empty());
            } else {
                assert!(r.median_s.is_some());
                assert_eq!(r.samples.len(), REPEATS);
            }
        }
    }

    #[test]
    fn failure_on_a_late_warmup_still_isolates_the_pair() {
        // The pair's 3rd execution fails (i.e. the first timed repetition
        // after both warm-ups); the record exists, empty, and the rest of
        // the run is unaffected.
        let mut conn = ScriptedConn::failing_on("SUM(Earnings)", 3);
        let records = run_raw(&mut conn, &[("raw_data_1MB", "1")], RAW_QUERIES, &stamp());

        assert_eq!(records.len(), 5);
        let q5 = records.iter().find(|r| r.query == "Q5").unwrap();
        assert!(q5.median_s.is_none());
        assert!(q5.samples.is_empty());
        assert!(records
            .iter()
            .filter(|r| r.query != "Q5")
            .all(|r| r.median_s.is_some()));
    }

    #[test]
    fn normalized_run_uses_the_implicit_source() {
        let mut conn = ScriptedConn::new();
        let records = run_normalized(&mut conn, NORMALIZED_QUERIES, &stamp());

        assert_eq!(records.len(), NORMALIZED_QUERIES.len());
        assert!(records.iter().all(|r| r.table == NORMALIZED_SOURCE));
        assert!(records.iter().all(|r| r.size_mb == NORMALIZED_SIZE_MB));
    }
}
