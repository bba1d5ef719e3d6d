//! Database connection settings.

use crate::config::{parse_or, Lookup};
use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// `postgres://...`, `sqlite://path?mode=rwc` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    /// Connection attempts at startup before giving up.
    pub connect_attempts: u32,
    pub connect_interval_ms: u64,
}

impl DbConfig {
    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, AppError> {
        let url = lookup("LEELA_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if !(url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("sqlite:"))
        {
            return Err(AppError::config(
                "LEELA_DATABASE_URL must be a postgres:// or sqlite: URL",
            ));
        }

        let cfg = Self {
            max_connections: parse_or(lookup, "LEELA_DB_MAX_CONNECTIONS", 10)?,
            connect_attempts: parse_or(lookup, "LEELA_DB_CONNECT_ATTEMPTS", 5)?,
            connect_interval_ms: parse_or(lookup, "LEELA_DB_CONNECT_INTERVAL_MS", 500)?,
            url,
        };
        if cfg.max_connections == 0 || cfg.connect_attempts == 0 {
            return Err(AppError::config(
                "LEELA_DB_MAX_CONNECTIONS and LEELA_DB_CONNECT_ATTEMPTS must be at least 1",
            ));
        }
        Ok(cfg)
    }

    /// In-memory settings for tests and local runs.
    pub fn in_memory() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 1,
            connect_attempts: 1,
            connect_interval_ms: 0,
        }
    }

    /// Each in-memory SQLite connection is its own database, so the pool
    /// must hold exactly one.
    pub fn is_sqlite_memory(&self) -> bool {
        self.url.starts_with("sqlite::memory:") || self.url.contains("mode=memory")
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }

    pub fn effective_max_connections(&self) -> u32 {
        if self.is_sqlite_memory() {
            1
        } else {
            self.max_connections
        }
    }
}
