//! Runtime configuration read from the environment.
//!
//! Every value has a default so a bare `cargo run` serves against an
//! in-memory database. Malformed values fail startup with `AppError::Config`.

pub mod db;

use std::str::FromStr;

use crate::error::AppError;

pub use db::DbConfig;

/// Environment-style key lookup; `std::env::var` in production.
pub type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

pub(crate) fn parse_or<T>(lookup: &Lookup<'_>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{key} is invalid ('{raw}'): {e}"))),
    }
}

/// Retry budget and pacing for workflow steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub max_attempts: u32,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    pub step_timeout_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_base_ms: 50,
            retry_max_ms: 2_000,
            step_timeout_ms: 5_000,
        }
    }
}

impl WorkflowConfig {
    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, AppError> {
        let d = Self::default();
        let cfg = Self {
            max_attempts: parse_or(lookup, "WORKFLOW_MAX_ATTEMPTS", d.max_attempts)?,
            retry_base_ms: parse_or(lookup, "WORKFLOW_RETRY_BASE_MS", d.retry_base_ms)?,
            retry_max_ms: parse_or(lookup, "WORKFLOW_RETRY_MAX_MS", d.retry_max_ms)?,
            step_timeout_ms: parse_or(lookup, "WORKFLOW_STEP_TIMEOUT_MS", d.step_timeout_ms)?,
        };
        if cfg.max_attempts == 0 {
            return Err(AppError::config("WORKFLOW_MAX_ATTEMPTS must be at least 1"));
        }
        if cfg.step_timeout_ms == 0 {
            return Err(AppError::config("WORKFLOW_STEP_TIMEOUT_MS must be positive"));
        }
        if cfg.retry_max_ms < cfg.retry_base_ms {
            return Err(AppError::config(
                "WORKFLOW_RETRY_MAX_MS must not be below WORKFLOW_RETRY_BASE_MS",
            ));
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    /// Publish notifications to Redis as well as the in-process hub.
    pub redis_url: Option<String>,
    pub workflow: WorkflowConfig,
}

impl Default for AppConfig {
    /// Local defaults: all interfaces, port 3001, in-memory SQLite, no Redis.
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            db: DbConfig::in_memory(),
            redis_url: None,
            workflow: WorkflowConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self, AppError> {
        Ok(Self {
            host: lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup, "BACKEND_PORT", 3001)?,
            db: DbConfig::from_lookup(lookup)?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            workflow: WorkflowConfig::from_lookup(lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.redis_url, None);
        assert_eq!(cfg.workflow, WorkflowConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(&lookup_from(&[
            ("BACKEND_PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("WORKFLOW_MAX_ATTEMPTS", "2"),
            ("WORKFLOW_STEP_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(cfg.workflow.max_attempts, 2);
        assert_eq!(cfg.workflow.step_timeout_ms, 250);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = AppConfig::from_lookup(&lookup_from(&[("BACKEND_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("BACKEND_PORT"));

        let err =
            AppConfig::from_lookup(&lookup_from(&[("WORKFLOW_MAX_ATTEMPTS", "0")])).unwrap_err();
        assert!(err.to_string().contains("WORKFLOW_MAX_ATTEMPTS"));

        let err = AppConfig::from_lookup(&lookup_from(&[
            ("WORKFLOW_RETRY_BASE_MS", "500"),
            ("WORKFLOW_RETRY_MAX_MS", "100"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("WORKFLOW_RETRY_MAX_MS"));
    }

    #[test]
    #[serial]
    fn reads_process_environment() {
        std::env::set_var("WORKFLOW_RETRY_BASE_MS", "75");
        let cfg = AppConfig::from_env();
        std::env::remove_var("WORKFLOW_RETRY_BASE_MS");
        assert_eq!(cfg.unwrap().workflow.retry_base_ms, 75);
    }

    #[test]
    fn blank_redis_url_is_ignored() {
        let cfg = AppConfig::from_lookup(&lookup_from(&[("REDIS_URL", "  ")])).unwrap();
        assert_eq!(cfg.redis_url, None);
    }
}
