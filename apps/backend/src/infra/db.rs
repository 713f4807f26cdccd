use std::future::Future;
use std::time::Duration;

use migration::{get_latest_migration_version, migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_CONNECT_INTERVAL_MS: u64 = 500;

/// Retry a connection attempt with fixed interval delays.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(conn);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(kind: DbKind, url: String) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.acquire_timeout(Duration::from_secs(5)).sqlx_logging(false);
    match kind {
        // Every in-memory connection is its own database, so the pool must
        // hold exactly one connection for its whole life.
        DbKind::SqliteMemory => {
            opt.min_connections(1)
                .max_connections(1)
                .idle_timeout(Duration::from_secs(u32::MAX as u64))
                .max_lifetime(Duration::from_secs(u32::MAX as u64));
        }
        DbKind::SqliteFile => {
            opt.max_connections(4);
        }
        DbKind::Postgres => {
            opt.min_connections(1).max_connections(16);
        }
    }
    opt
}

/// Open a pool for `kind`. Does NOT run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let opt = connect_options(kind, url);

    if kind == DbKind::Postgres {
        retry_connection(
            || {
                let opt = opt.clone();
                async move { Database::connect(opt).await.map_err(AppError::from) }
            },
            PG_CONNECT_ATTEMPTS,
            PG_CONNECT_INTERVAL_MS,
        )
        .await
    } else {
        Ok(Database::connect(opt).await?)
    }
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    info!(db_kind = ?kind, "bootstrap=start");
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    let version = get_latest_migration_version(&conn).await?;
    info!(db_kind = ?kind, migration = version.as_deref().unwrap_or("none"), "bootstrap=ready");
    Ok(conn)
}
