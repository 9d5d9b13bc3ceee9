//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and timeouts taken from
//! `StoreConfig`. A connection checked out of the pool goes back when its
//! guard drops, whether or not the statement succeeded.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::StoreConfig;

/// Create a PostgreSQL connection pool.
///
/// Opens one connection eagerly so bad credentials fail at startup.
///
/// # Errors
///
/// Returns an error if the connection fails or times out.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&StoreConfig::from_env()?).await?;
/// ```
pub async fn create_pool(config: &StoreConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.connect_options())
        .await
}
