//! MySQL adapter (via the blocking `mysql` client).
//!
//! The benchmark is fully sequential, so the blocking client is the right
//! shape: one connection, one statement in flight, no runtime.

use super::QueryExecutor;
use crate::config::ConnectionConfig;
use crate::{BenchError, BenchResult};
use mysql::prelude::Queryable;
use mysql::{Conn, LocalInfileHandler, OptsBuilder, Row};
use std::time::Duration;

pub struct MySqlAdapter {
    conn: Conn,
}

impl MySqlAdapter {
    /// Open a connection with the given parameters. Failure here aborts the
    /// whole run; there is nothing to measure without a server.
    pub fn connect(cfg: &ConnectionConfig) -> BenchResult<Self> {
        let mut opts = OptsBuilder::new()
            .ip_or_hostname(Some(cfg.host.clone()))
            .tcp_port(cfg.port)
            .user(Some(cfg.user.clone()))
            .pass(Some(cfg.password.clone()))
            .db_name(Some(cfg.database.clone()))
            .tcp_connect_timeout(Some(Duration::from_secs(cfg.connect_timeout_secs)));

        if cfg.allow_local_infile {
            // Serve LOAD DATA LOCAL INFILE straight from the client
            // filesystem; only the CSV ingestion setup asks for it.
            opts = opts.local_infile_handler(Some(LocalInfileHandler::new(|file_name, writer| {
                let name = String::from_utf8_lossy(file_name).into_owned();
                let mut file = std::fs::File::open(name)?;
                std::io::copy(&mut file, writer)?;
                Ok(())
            })));
        }

        let conn = Conn::new(opts).map_err(|e| {
            BenchError::Connection(format!(
                "{}:{} database '{}': {}",
                cfg.host, cfg.port, cfg.database, e
            ))
        })?;

        Ok(Self { conn })
    }
}

impl QueryExecutor for MySqlAdapter {
    fn fetch_all(&mut self, sql: &str) -> BenchResult<u64> {
        // Materialize every row, like a buffered cursor's fetchall: the timed
        // span must include full result retrieval.
        let rows: Vec<Row> = self.conn.query(sql).map_err(|e| BenchError::Query {
            sql: sql.to_string(),
            cause: e.to_string(),
        })?;
        Ok(rows.len() as u64)
    }

    fn execute(&mut self, sql: &str) -> BenchResult<()> {
        self.conn.query_drop(sql).map_err(|e| BenchError::Query {
            sql: sql.to_string(),
            cause: e.to_string(),
        })
    }
}
