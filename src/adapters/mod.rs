//! Query executor seam and database adapters.

pub mod mysql_adapter;

use crate::BenchResult;

/// Blocking executor over one open connection.
///
/// `fetch_all` must drain the entire result set before returning, so a
/// caller's wall-clock span around it covers full retrieval rather than just
/// dispatch. One statement is in flight at a time; a failed statement leaves
/// the connection usable for the next one.
pub trait QueryExecutor {
    /// Execute a result-producing statement and consume every row.
    /// Returns the number of rows retrieved.
    fn fetch_all(&mut self, sql: &str) -> BenchResult<u64>;

    /// Execute a statement for its side effects, discarding any result.
    fn execute(&mut self, sql: &str) -> BenchResult<()>;
}
