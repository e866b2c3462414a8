use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::CoachResult;

pub type DbPool = SqlitePool;

/// Open the connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> CoachResult<DbPool> {
  tracing::info!(database_url, "initializing workout database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("workout database ready");

  Ok(pool)
}
