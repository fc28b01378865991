//! Postgres connection pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{DbError, PgStore};

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Create a new connection pool from the given `database_url`.
///
/// `max_connections` controls the pool ceiling.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!("Connecting to database (max_connections={})", max_connections);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Connect and wrap the pool in a [`PgStore`].
pub async fn connect_store(database_url: &str, max_connections: u32) -> Result<PgStore, DbError> {
    Ok(PgStore::new(create_pool(database_url, max_connections).await?))
}
