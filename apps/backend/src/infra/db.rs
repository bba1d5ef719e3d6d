//! Database bootstrap: connect with retry, then bring the schema up to date.

use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::error::AppError;

/// Retry `connect_fn` with a fixed interval. Returns the last error once the
/// attempts are used up.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Mask the password in a connection URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth.rsplit_once(':') {
        Some((scheme_user, _)) if scheme_user.contains("://") => {
            format!("{scheme_user}:***@{host}")
        }
        _ => url.to_string(),
    }
}

fn connect_options(cfg: &DbConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    let max = cfg.effective_max_connections();
    opts.max_connections(max)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if cfg.is_sqlite_memory() {
        // Losing the only connection loses the database.
        opts.min_connections(1)
            .max_lifetime(Duration::from_secs(60 * 60 * 24 * 365));
    }
    opts
}

/// Open the pool without touching the schema.
pub async fn connect(cfg: &DbConfig) -> Result<DatabaseConnection, AppError> {
    info!(url = %sanitize_db_url(&cfg.url), max_connections = cfg.effective_max_connections(), "connecting to database");
    let conn = retry_connection(
        || async {
            let conn = Database::connect(connect_options(cfg)).await?;
            if cfg.is_sqlite() {
                conn.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
            }
            Ok(conn)
        },
        cfg.connect_attempts,
        cfg.connect_interval_ms,
    )
    .await?;
    Ok(conn)
}

/// Connect and apply pending migrations.
pub async fn bootstrap_db(cfg: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let conn = connect(cfg).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
