use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
///
/// Connects lazily: the pool is usable immediately and the first query opens a
/// connection, so the built-in template catalog keeps working while the database
/// is still coming up.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)?;

    info!("PostgreSQL connection pool configured");
    Ok(pool)
}
