//! Connection configuration.
//!
//! Parameters are read from the environment once, in `main`, and passed down
//! as a ready struct; nothing below `main` touches ambient state. That keeps
//! the executor seam testable against fakes.

use std::env;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub connect_timeout_secs: u64,
    /// Client-side `LOAD DATA LOCAL INFILE` support. Only the raw CSV
    /// ingestion setup needs it; measurement runs leave it off.
    pub allow_local_infile: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: String::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            allow_local_infile: false,
        }
    }
}

impl ConnectionConfig {
    /// Defaults overlaid with `MYSQL_*` environment variables where present.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("MYSQL_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = env::var("MYSQL_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                cfg.port = port;
            }
        }
        if let Ok(user) = env::var("MYSQL_USER") {
            cfg.user = user;
        }
        if let Ok(password) = env::var("MYSQL_PASSWORD") {
            cfg.password = password;
        }
        if let Ok(database) = env::var("MYSQL_DATABASE") {
            cfg.database = database;
        }
        if let Ok(secs) = env::var("MYSQL_CONNECT_TIMEOUT") {
            if let Ok(secs) = secs.parse::<u64>() {
                cfg.connect_timeout_secs = secs;
            }
        }
        if let Ok(flag) = env::var("MYSQL_ALLOW_LOCAL_INFILE") {
            cfg.allow_local_infile = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        cfg
    }
}
