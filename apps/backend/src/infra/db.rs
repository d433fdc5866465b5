use std::future::Future;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::{info, warn};

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all retries are exhausted.
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
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
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

/// Connect to Postgres for the given profile and owner.
/// This function does NOT run any migrations.
pub async fn connect_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile, owner)?;

    retry_connection(
        || {
            let url = database_url.clone();
            async move {
                let mut opts = ConnectOptions::new(url);
                opts.max_connections(16)
                    .connect_timeout(Duration::from_secs(5))
                    .sqlx_logging(false);
                Database::connect(opts).await.map_err(AppError::from)
            }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await
}

/// Private in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every statement on the same database
/// and serializes transactions, which the conditional commit relies on.
pub async fn connect_sqlite_memory() -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(3600))
        .sqlx_logging(false);
    let conn = Database::connect(opts).await?;

    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        "PRAGMA foreign_keys = ON;".to_string(),
    ))
    .await?;

    migration::migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}

/// Connect with application credentials and bring the schema up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    // Migrations need owner rights; the app connection does not
    let owner = connect_db(profile, DbOwner::Owner).await?;
    migration::migrate(&owner, MigrationCommand::Up).await?;
    owner.close().await?;

    let conn = connect_db(profile, DbOwner::App).await?;
    info!(backend = ?conn.get_database_backend(), "database ready");
    Ok(conn)
}
