use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .idle_timeout(Duration::from_secs(30))
}

/// Creates the PostgreSQL pool and checks that a connection can be opened.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = pool_options().connect(database_url).await?;
    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// A pool that connects on first use. Requests that never reach a query
/// (public routes, rejected tokens) run without a database.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> Result<PgPool> {
    Ok(pool_options().connect_lazy(database_url)?)
}
