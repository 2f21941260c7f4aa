pub mod init;
pub mod seed;
pub mod serve;
pub mod token;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Eagerly-connecting pool for one-shot commands; failing fast beats the
/// lazy pool the server uses.
pub async fn connect_pool() -> anyhow::Result<PgPool> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("failed to connect to database")
}
