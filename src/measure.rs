//! Warm-up-and-measure engine.
//!
//! A query is executed and fully consumed `WARMUPS` times without timing, to
//! let the server settle caches and reuse plans, then `REPEATS` times with
//! the wall clock running. The reported statistic is the median of the timed
//! samples; the raw samples are kept alongside it in execution order.

use crate::adapters::QueryExecutor;
use crate::BenchResult;
use std::time::Instant;

/// Discarded executions before timing starts.
pub const WARMUPS: usize = 2;
/// Timed repetitions per query.
pub const REPEATS: usize = 7;

/// Timed result for one query.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub median_s: f64,
    /// Seconds per timed repetition, in execution order, not sorted.
    pub samples: Vec<f64>,
}

/// Run `sql` WARMUPS + REPEATS times, timing the last REPEATS.
///
/// Each timed span covers issuing the query through draining the whole
/// result set; result-set size differs per query and is part of what is
/// being measured. The first error from the server, warm-up included, fails
/// the whole measurement and discards any samples already taken.
pub fn measure_query(db: &mut dyn QueryExecutor, sql: &str) -> BenchResult<Measurement> {
    for _ in 0..WARMUPS {
        db.fetch_all(sql)?;
    }

    let mut samples = Vec::with_capacity(REPEATS);
    for _ in 0..REPEATS {
        let start = Instant::now();
        db.fetch_all(sql)?;
        samples.push(start.elapsed().as_secs_f64());
    }

    Ok(Measurement {
        median_s: median(&samples),
        samples,
    })
}

/// Conventional median: the middle of the sorted samples, or the mean of the
/// two middle values for an even count. `samples` must be non-empty.
pub fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::ScriptedConn;
    use std::time::Duration;

    #[test]
    fn median_of_odd_count_is_middle_sorted() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[5.0]), 5.0);
    }

    #[test]
    fn median_of_even_count_is_mean_of_middles() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn measure_runs_warmups_then_repeats() {
        let mut conn = ScriptedConn::new();
        let m = measure_query(&mut conn, "SELECT 1").unwrap();

        assert_eq!(conn.seen.len(), WARMUPS + REPEATS);
        assert!(conn.seen.iter().all(|s| s == "SELECT 1"));
        assert_eq!(m.samples.len(), REPEATS);
        assert!(m.samples.iter().all(|&s| s >= 0.0));
        assert_eq!(m.median_s, median(&m.samples));
    }

    #[test]
    fn samples_reflect_real_latency() {
        let mut conn = ScriptedConn::with_latency(Duration::from_millis(10));
        let m = measure_query(&mut conn, "SELECT 1").unwrap();

        assert!(m.samples.iter().all(|&s| s >= 0.01));
        assert!(m.samples.iter().all(|&s| s < 0.5));
        assert!(m.median_s >= 0.01);
    }

    #[test]
    fn samples_keep_execution_order_not_sorted_order() {
        // Only the first timed repetition is slow; a sorted sequence would
        // move it to the end.
        let mut conn = ScriptedConn::new();
        conn.slow_call = Some((WARMUPS + 1, Duration::from_millis(50)));
        let m = measure_query(&mut conn, "SELECT 1").unwrap();

        assert!(m.samples[0] >= 0.05);
        assert!(m.samples[1..].iter().all(|&s| s < m.samples[0]));
    }

    #[test]
    fn failure_during_warmup_discards_everything() {
        let mut conn = ScriptedConn::failing_on("SELECT", 2);
        let err = measure_query(&mut conn, "SELECT 1").unwrap_err();

        assert!(err.to_string().contains("SELECT 1"));
        // The failure happened before any timed repetition ran.
        assert_eq!(conn.seen.len(), 2);
    }

    #[test]
    fn failure_during_timed_run_discards_everything() {
        // Warm-ups pass; the 2nd timed repetition fails.
        let mut conn = ScriptedConn::failing_on("SELECT", WARMUPS + 2);
        assert!(measure_query(&mut conn, "SELECT 1").is_err());
        assert_eq!(conn.seen.len(), WARMUPS + 2);
    }
}
