use crate::database::sqlite_store::SqliteStore;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // An in-memory database lives as long as its connection, so it gets exactly
    // one that is never recycled.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(30))
    };

    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

/// Connects to the local store and applies pending schema revisions.
pub async fn open_store(database_url: &str) -> Result<SqliteStore> {
    let pool = create_pool(database_url).await?;
    SqliteStore::open(pool).await
}
