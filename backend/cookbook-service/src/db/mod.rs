//! Database connection pool and migrations

use crate::config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, error, info};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Idle connections are closed after this many seconds
const IDLE_TIMEOUT_SECS: u64 = 600;
/// Connections are recycled after this many seconds
const MAX_LIFETIME_SECS: u64 = 1800;

/// Create a PostgreSQL pool and verify it with `SELECT 1`.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        "Creating database pool: max={}, min={}, acquire_timeout={}s, verify_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
        config.connect_timeout_secs,
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(IDLE_TIMEOUT_SECS))
        .max_lifetime(Duration::from_secs(MAX_LIFETIME_SECS))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!("Database pool created and verified successfully");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Apply pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}
